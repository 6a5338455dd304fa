//! Block → styled runs.
//!
//! Rendering walks a block's raw text left to right. Each piece of syntax or
//! content is cut from the text at offsets taken from the AST, so the leaves
//! always concatenate back to the block's raw text; modes only change which
//! slot and style a leaf gets, never whether it is emitted.

use crate::ast::{Block, BlockNode, Inline, InlineNode};
use crate::document::Document;

use super::run::{RenderMode, RenderedBlock, StyledRun};
use super::style::{StyleConfig, StyleSlot, TextStyle};

/// Index of the block the cursor is in, if any.
///
/// `cursor` is a character index into the source, as editors report the
/// caret. It is converted to a byte offset before the lookup. A cursor equal
/// to the character count (after the last character) activates the last
/// block even though no span contains it; anything past that activates
/// nothing.
pub fn active_block_for(doc: &Document, cursor: Option<usize>) -> Option<usize> {
    let offset = doc.byte_offset_for_char(cursor?)?;
    doc.block_index_at_offset(offset)
}

pub fn mode_for(block_index: usize, active: Option<usize>) -> RenderMode {
    if active == Some(block_index) {
        RenderMode::Revealed
    } else {
        RenderMode::Collapsed
    }
}

/// Render every block, revealing only `active`.
pub fn render_document(
    doc: &Document,
    active: Option<usize>,
    styles: &StyleConfig,
) -> Vec<RenderedBlock> {
    doc.blocks()
        .iter()
        .enumerate()
        .map(|(block_index, block)| {
            let mode = mode_for(block_index, active);
            RenderedBlock {
                block_index,
                mode,
                runs: render_block(block, mode, styles),
            }
        })
        .collect()
}

/// A single body-styled run over `text`, shown while structured output is
/// not available.
pub fn unstyled(text: &str, styles: &StyleConfig) -> StyledRun {
    StyledRun::Text {
        text: text.to_string(),
        slot: StyleSlot::Body,
        style: styles.body.clone(),
    }
}

pub fn render_block(block: &BlockNode, mode: RenderMode, styles: &StyleConfig) -> Vec<StyledRun> {
    let mut e = Emitter {
        styles,
        mode,
        text: &block.span.raw_text,
        base: block.span.start,
        pos: block.span.start,
        out: Vec::new(),
    };
    let content = &block.content_span;
    let body = &styles.body;

    match &block.block {
        Block::Heading {
            level, children, ..
        } => {
            let slot = StyleSlot::heading(*level);
            let style = styles.get(slot);
            e.delimiter(content.start, style);
            e.inlines(children, slot);
            e.leaf(content.end, slot, style.clone());
        }
        Block::SetextHeading { level, children, .. } => {
            let slot = StyleSlot::heading(*level);
            let style = styles.get(slot);
            e.inlines(children, slot);
            e.leaf(content.end, slot, style.clone());
            // Terminator of the text line, then the underline line as syntax
            let line_end = e.line_end();
            e.leaf(line_end, StyleSlot::Body, body.clone());
            e.delimiter(block.span.end, style);
        }
        Block::Paragraph { children } => {
            e.inlines(children, StyleSlot::Body);
        }
        Block::ThematicBreak { .. } => match mode {
            RenderMode::Revealed => e.delimiter(content.end, body),
            RenderMode::Collapsed => {
                e.leaf(content.end, StyleSlot::ThematicBreak, styles.thematic_break.clone())
            }
        },
        Block::BlankLine => {}
        Block::FencedCode { .. } => {
            e.delimiter(content.start, body);
            e.leaf(content.end, StyleSlot::CodeBlock, styles.code_block.clone());
            e.delimiter(block.span.end, body);
        }
        Block::MathBlock { .. } => {
            e.delimiter(content.start, body);
            e.leaf(content.end, StyleSlot::Math, styles.math.clone());
            e.delimiter(block.span.end, body);
        }
        Block::Blockquote { children, .. } => {
            e.delimiter(content.start, &styles.blockquote);
            e.inlines(children, StyleSlot::Blockquote);
        }
        Block::UnorderedListItem { children, .. } | Block::OrderedListItem { children, .. } => {
            match mode {
                RenderMode::Revealed => e.delimiter(content.start, body),
                RenderMode::Collapsed => {
                    e.leaf(content.start, StyleSlot::ListMarker, styles.list_marker.clone())
                }
            }
            e.inlines(children, StyleSlot::Body);
        }
        Block::Table { .. } => {
            e.leaf(block.span.end, StyleSlot::Table, styles.table.clone());
        }
        Block::FootnoteDefinition { label, children } => {
            let label_start = block.span.start + 2;
            e.delimiter(label_start, body);
            e.leaf(
                label_start + label.len(),
                StyleSlot::FootnoteRef,
                styles.footnote_ref.clone(),
            );
            e.delimiter(content.start, body);
            e.inlines(children, StyleSlot::Body);
        }
        Block::TableOfContents { .. } => {
            e.delimiter(content.end, body);
        }
    }

    // Line terminators and anything else left over
    e.leaf(block.span.end, StyleSlot::Body, body.clone());
    e.out
}

/// Cuts consecutive runs off a block's raw text.
struct Emitter<'a> {
    styles: &'a StyleConfig,
    mode: RenderMode,
    text: &'a str,
    /// Absolute offset of `text`
    base: usize,
    /// Absolute offset of the first byte not yet emitted
    pos: usize,
    out: Vec<StyledRun>,
}

impl<'a> Emitter<'a> {
    /// Text from the current position up to absolute offset `end`.
    fn take(&mut self, end: usize) -> &'a str {
        let text = self.text;
        let end = end.clamp(self.pos, self.base + text.len());
        let taken = text
            .get(self.pos - self.base..end - self.base)
            .unwrap_or_default();
        self.pos = end;
        taken
    }

    /// Absolute offset just past the next line terminator (or the end).
    fn line_end(&self) -> usize {
        let rest = self.text.get(self.pos - self.base..).unwrap_or_default();
        self.pos + rest.find('\n').map_or(rest.len(), |i| i + 1)
    }

    fn leaf_run(&mut self, end: usize, slot: StyleSlot, style: TextStyle) -> Option<StyledRun> {
        let text = self.take(end);
        (!text.is_empty()).then(|| StyledRun::Text {
            text: text.to_string(),
            slot,
            style,
        })
    }

    /// Syntax up to `end`, muted over `base` when revealed, suppressed when collapsed.
    fn delimiter_run(&mut self, end: usize, base: &TextStyle) -> Option<StyledRun> {
        let styles = self.styles;
        match self.mode {
            RenderMode::Revealed => {
                let style = base.layered(&styles.delimiter_visible);
                self.leaf_run(end, StyleSlot::DelimiterVisible, style)
            }
            RenderMode::Collapsed => {
                let style = styles.delimiter_suppressed.clone();
                self.leaf_run(end, StyleSlot::DelimiterSuppressed, style)
            }
        }
    }

    fn leaf(&mut self, end: usize, slot: StyleSlot, style: TextStyle) {
        if let Some(run) = self.leaf_run(end, slot, style) {
            self.out.push(run);
        }
    }

    fn delimiter(&mut self, end: usize, base: &TextStyle) {
        if let Some(run) = self.delimiter_run(end, base) {
            self.out.push(run);
        }
    }

    fn inlines(&mut self, nodes: &[InlineNode], slot: StyleSlot) {
        for node in nodes {
            let run = self.inline(node, slot);
            self.out.extend(run);
        }
    }

    fn inline(&mut self, node: &InlineNode, base_slot: StyleSlot) -> Option<StyledRun> {
        let styles = self.styles;
        let base = styles.get(base_slot);
        let len = node.span.len();
        // (slot, opening syntax length, content length); the rest is closing syntax
        let (slot, open, content) = match &node.inline {
            Inline::PlainText { .. } => {
                return self.leaf_run(node.span.end, base_slot, base.clone());
            }
            Inline::Bold { delimiter_text, .. } => {
                wrapped(StyleSlot::Bold, delimiter_text.len(), len)
            }
            Inline::Italic { delimiter_text, .. } => {
                wrapped(StyleSlot::Italic, delimiter_text.len(), len)
            }
            Inline::BoldItalic { delimiter_text, .. } => {
                wrapped(StyleSlot::BoldItalic, delimiter_text.len(), len)
            }
            Inline::Strikethrough { .. } => wrapped(StyleSlot::Strikethrough, 2, len),
            Inline::Highlight { .. } => wrapped(StyleSlot::Highlight, 2, len),
            Inline::Subscript { .. } => wrapped(StyleSlot::Subscript, 1, len),
            Inline::Superscript { .. } => wrapped(StyleSlot::Superscript, 1, len),
            Inline::InlineMath { delimiter_text, .. } => {
                wrapped(StyleSlot::Math, delimiter_text.len(), len)
            }
            Inline::InlineCode { delimiter_text, .. } => {
                wrapped(StyleSlot::Code, delimiter_text.len(), len)
            }
            Inline::Emoji { .. } => wrapped(StyleSlot::Emoji, 1, len),
            Inline::EscapedChar { .. } => (base_slot, 1, len.saturating_sub(1)),
            Inline::FootnoteRef { label } => (StyleSlot::FootnoteRef, 2, label.len()),
            Inline::Autolink { url } => (StyleSlot::Link, 1, url.len()),
            Inline::Link { text, .. } => (StyleSlot::Link, 1, text.len()),
            Inline::Image { alt, .. } => (StyleSlot::ImageAlt, 2, alt.len()),
        };

        let style = base.layered(styles.get(slot));
        let content_start = node.span.start + open;
        let children: Vec<StyledRun> = [
            self.delimiter_run(content_start, &style),
            self.leaf_run(content_start + content, slot, style.clone()),
            self.delimiter_run(node.span.end, &style),
        ]
        .into_iter()
        .flatten()
        .collect();

        Some(StyledRun::Group {
            slot,
            style,
            children,
        })
    }
}

fn wrapped(slot: StyleSlot, delimiter: usize, len: usize) -> (StyleSlot, usize, usize) {
    (slot, delimiter, len.saturating_sub(2 * delimiter))
}
