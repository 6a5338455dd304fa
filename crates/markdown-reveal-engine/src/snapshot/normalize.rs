use std::fmt;

use crate::ast::{Block, BlockNode, Inline, InlineNode, NodeKind};
use crate::document::Document;

/// A stable, printable projection of a document for snapshot tests and
/// the `dump` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snap {
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSnap {
    pub kind: NodeKind,
    pub span: (usize, usize),
    /// Construct-specific fields, e.g. `level=2 delimiter="## "`
    pub detail: String,
    pub inline: Vec<InlineSnap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSnap {
    pub kind: NodeKind,
    pub span: (usize, usize),
    pub detail: String,
    pub children: Vec<InlineSnap>,
}

pub fn normalize(doc: &Document) -> Snap {
    Snap {
        blocks: doc.blocks().iter().map(block_snap).collect(),
    }
}

fn block_snap(b: &BlockNode) -> BlockSnap {
    let detail = match &b.block {
        Block::Heading {
            level,
            delimiter_text,
            ..
        } => format!("level={level} delimiter={delimiter_text:?}"),
        Block::SetextHeading {
            level,
            underline_text,
            ..
        } => format!("level={level} underline={underline_text:?}"),
        Block::Paragraph { .. } | Block::BlankLine => String::new(),
        Block::ThematicBreak { marker_text } | Block::TableOfContents { marker_text } => {
            format!("marker={marker_text:?}")
        }
        Block::FencedCode {
            fence_text,
            info_string,
            closing_fence,
            ..
        } => {
            let mut detail = format!("fence={fence_text:?}");
            if let Some(info) = info_string {
                detail.push_str(&format!(" info={info:?}"));
            }
            if closing_fence.is_none() {
                detail.push_str(" unterminated");
            }
            detail
        }
        Block::MathBlock { delimiter_text, .. } => format!("delimiter={delimiter_text:?}"),
        Block::Blockquote { marker_text, .. } => format!("marker={marker_text:?}"),
        Block::UnorderedListItem {
            marker_text,
            indent,
            task,
            ..
        } => {
            let mut detail = format!("marker={marker_text:?} indent={indent:?}");
            if let Some(task) = task {
                detail.push_str(&format!(" task={}", task.marker_text));
            }
            detail
        }
        Block::OrderedListItem {
            number_text,
            punctuation,
            indent,
            task,
            ..
        } => {
            let mut detail =
                format!("number={number_text:?} punctuation={punctuation:?} indent={indent:?}");
            if let Some(task) = task {
                detail.push_str(&format!(" task={}", task.marker_text));
            }
            detail
        }
        Block::Table {
            header_row,
            alignments,
            body_rows,
        } => format!(
            "header={header_row:?} alignments={alignments:?} rows={}",
            body_rows.len()
        ),
        Block::FootnoteDefinition { label, .. } => format!("label={label:?}"),
    };

    BlockSnap {
        kind: b.kind(),
        span: (b.span.start, b.span.end),
        detail,
        inline: b.inlines().iter().map(inline_snap).collect(),
    }
}

fn inline_snap(n: &InlineNode) -> InlineSnap {
    let detail = match &n.inline {
        Inline::PlainText { text } => format!("{text:?}"),
        Inline::Bold { delimiter_text, .. }
        | Inline::Italic { delimiter_text, .. }
        | Inline::BoldItalic { delimiter_text, .. } => format!("delimiter={delimiter_text:?}"),
        Inline::Strikethrough { .. }
        | Inline::Highlight { .. }
        | Inline::Subscript { .. }
        | Inline::Superscript { .. } => String::new(),
        Inline::InlineCode {
            delimiter_text,
            code_text,
        } => format!("delimiter={delimiter_text:?} code={code_text:?}"),
        Inline::InlineMath { tex, .. } => format!("tex={tex:?}"),
        Inline::Link { text, url, title } => format!("text={text:?} url={url:?} title={title:?}"),
        Inline::Image { alt, url, title } => format!("alt={alt:?} url={url:?} title={title:?}"),
        Inline::Autolink { url } => format!("url={url:?}"),
        Inline::FootnoteRef { label } => format!("label={label:?}"),
        Inline::Emoji { shortcode } => format!("shortcode={shortcode:?}"),
        Inline::EscapedChar { ch } => format!("{ch:?}"),
    };

    InlineSnap {
        kind: n.kind(),
        span: (n.span.start, n.span.end),
        detail,
        children: n.children().iter().map(inline_snap).collect(),
    }
}

fn write_line(
    f: &mut fmt::Formatter<'_>,
    depth: usize,
    kind: NodeKind,
    span: (usize, usize),
    detail: &str,
) -> fmt::Result {
    write!(f, "{}{kind:?}@{}..{}", "  ".repeat(depth), span.0, span.1)?;
    if !detail.is_empty() {
        write!(f, " {detail}")?;
    }
    writeln!(f)
}

fn write_inline(f: &mut fmt::Formatter<'_>, depth: usize, node: &InlineSnap) -> fmt::Result {
    write_line(f, depth, node.kind, node.span, &node.detail)?;
    for child in &node.children {
        write_inline(f, depth + 1, child)?;
    }
    Ok(())
}

impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write_line(f, 0, block.kind, block.span, &block.detail)?;
            for node in &block.inline {
                write_inline(f, 1, node)?;
            }
        }
        Ok(())
    }
}
