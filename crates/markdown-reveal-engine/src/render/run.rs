use super::style::{StyleSlot, TextStyle};

/// Whether a block shows its syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// The block under the cursor: delimiters shown in a muted style.
    Revealed,
    /// Every other block: delimiters present but visually suppressed.
    Collapsed,
}

/// A node of the styled-run tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyledRun {
    Text {
        text: String,
        slot: StyleSlot,
        style: TextStyle,
    },
    /// A construct (bold span, link, ...) whose children are its delimiter and
    /// content runs.
    Group {
        slot: StyleSlot,
        style: TextStyle,
        children: Vec<StyledRun>,
    },
}

impl StyledRun {
    pub fn slot(&self) -> StyleSlot {
        match self {
            StyledRun::Text { slot, .. } | StyledRun::Group { slot, .. } => *slot,
        }
    }

    /// Depth-first concatenation of leaf text.
    pub fn leaf_text(&self) -> String {
        let mut out = String::new();
        self.push_leaf_text(&mut out);
        out
    }

    fn push_leaf_text(&self, out: &mut String) {
        match self {
            StyledRun::Text { text, .. } => out.push_str(text),
            StyledRun::Group { children, .. } => {
                for child in children {
                    child.push_leaf_text(out);
                }
            }
        }
    }

    /// Visit every leaf in order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a str, StyleSlot, &'a TextStyle)) {
        match self {
            StyledRun::Text { text, slot, style } => f(text, *slot, style),
            StyledRun::Group { children, .. } => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
        }
    }
}

/// Styled output for one block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub block_index: usize,
    pub mode: RenderMode,
    pub runs: Vec<StyledRun>,
}

impl RenderedBlock {
    /// Equals the block's raw text in either mode.
    pub fn leaf_text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            run.push_leaf_text(&mut out);
        }
        out
    }
}
