use markdown_reveal_syntax::table::Alignment;

use super::inline::InlineNode;
use super::kind::NodeKind;
use super::span::SourceSpan;

/// A top-level block of the document.
///
/// `span` covers the whole block including its line terminator(s);
/// `content_span` is the part that renders as content rather than syntax:
/// the inline text of a heading, the body of a fenced code block, the
/// marker of a thematic break. Everything in `span` before the content is
/// the block's prefix and everything after it is its suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub span: SourceSpan,
    pub content_span: SourceSpan,
    pub block: Block,
}

impl BlockNode {
    pub fn kind(&self) -> NodeKind {
        self.block.kind()
    }

    pub fn raw_text(&self) -> &str {
        &self.span.raw_text
    }

    /// Inline children, empty for blocks without inline content.
    pub fn inlines(&self) -> &[InlineNode] {
        self.block.inlines()
    }
}

/// A task list checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub checked: bool,
    /// `[ ]`, `[x]` or `[X]` verbatim
    pub marker_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        /// The hashes plus the separating whitespace, e.g. `"## "`.
        delimiter_text: String,
        children: Vec<InlineNode>,
    },
    SetextHeading {
        level: u8,
        underline_text: String,
        children: Vec<InlineNode>,
    },
    Paragraph {
        children: Vec<InlineNode>,
    },
    ThematicBreak {
        marker_text: String,
    },
    BlankLine,
    FencedCode {
        fence_text: String,
        info_string: Option<String>,
        code_text: String,
        /// `None` when the fence is never closed and the body runs to end of input.
        closing_fence: Option<String>,
    },
    MathBlock {
        delimiter_text: String,
        tex: String,
    },
    Blockquote {
        marker_text: String,
        children: Vec<InlineNode>,
    },
    UnorderedListItem {
        marker_text: String,
        indent: String,
        task: Option<Task>,
        children: Vec<InlineNode>,
    },
    OrderedListItem {
        number_text: String,
        /// `.` or `)`
        punctuation: char,
        indent: String,
        task: Option<Task>,
        children: Vec<InlineNode>,
    },
    Table {
        header_row: Vec<String>,
        alignments: Vec<Alignment>,
        body_rows: Vec<Vec<String>>,
    },
    FootnoteDefinition {
        label: String,
        children: Vec<InlineNode>,
    },
    TableOfContents {
        marker_text: String,
    },
}

impl Block {
    pub fn kind(&self) -> NodeKind {
        match self {
            Block::Heading { .. } => NodeKind::Heading,
            Block::SetextHeading { .. } => NodeKind::SetextHeading,
            Block::Paragraph { .. } => NodeKind::Paragraph,
            Block::ThematicBreak { .. } => NodeKind::ThematicBreak,
            Block::BlankLine => NodeKind::BlankLine,
            Block::FencedCode { .. } => NodeKind::FencedCode,
            Block::MathBlock { .. } => NodeKind::MathBlock,
            Block::Blockquote { .. } => NodeKind::Blockquote,
            Block::UnorderedListItem { .. } => NodeKind::UnorderedListItem,
            Block::OrderedListItem { .. } => NodeKind::OrderedListItem,
            Block::Table { .. } => NodeKind::Table,
            Block::FootnoteDefinition { .. } => NodeKind::FootnoteDefinition,
            Block::TableOfContents { .. } => NodeKind::TableOfContents,
        }
    }

    pub fn inlines(&self) -> &[InlineNode] {
        match self {
            Block::Heading { children, .. }
            | Block::SetextHeading { children, .. }
            | Block::Paragraph { children }
            | Block::Blockquote { children, .. }
            | Block::UnorderedListItem { children, .. }
            | Block::OrderedListItem { children, .. }
            | Block::FootnoteDefinition { children, .. } => children,
            Block::ThematicBreak { .. }
            | Block::BlankLine
            | Block::FencedCode { .. }
            | Block::MathBlock { .. }
            | Block::Table { .. }
            | Block::TableOfContents { .. } => &[],
        }
    }

    /// Heading level for ATX and setext headings.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Block::Heading { level, .. } | Block::SetextHeading { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            Block::UnorderedListItem { task, .. } | Block::OrderedListItem { task, .. } => {
                task.as_ref()
            }
            _ => None,
        }
    }

    pub fn is_task(&self) -> bool {
        self.task().is_some()
    }

    /// `Some(checked)` for task items, `None` otherwise.
    pub fn task_checked(&self) -> Option<bool> {
        self.task().map(|t| t.checked)
    }
}
