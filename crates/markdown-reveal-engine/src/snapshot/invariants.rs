use std::ops::Range;

use thiserror::Error;

use crate::ast::InlineNode;
use crate::document::Document;
use crate::render::RenderedBlock;

/// A broken guarantee of the parse or render output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("first block starts at {0}, not 0")]
    FirstBlockOffset(usize),
    #[error("block {index} ends at {end} but the next block starts at {next_start}")]
    NotContiguous {
        index: usize,
        end: usize,
        next_start: usize,
    },
    #[error("blocks end at {end}, source length is {len}")]
    Coverage { end: usize, len: usize },
    #[error("raw text of {what} does not match source[{start}..{end}]")]
    RawText {
        what: String,
        start: usize,
        end: usize,
    },
    #[error("block {index}: content span {content:?} is outside block span {span:?}")]
    ContentOutsideBlock {
        index: usize,
        content: Range<usize>,
        span: Range<usize>,
    },
    #[error("block {index}: inline nodes do not tile the content at offset {offset}")]
    InlineTiling { index: usize, offset: usize },
    #[error("concatenated blocks do not reproduce the source")]
    RoundTrip,
    #[error("rendered {rendered} blocks for a document of {blocks}")]
    RenderCount { rendered: usize, blocks: usize },
    #[error("rendered block {index}: leaf text does not match the block's raw text")]
    RenderText { index: usize },
}

/// Validates a parsed document.
///
/// Checks that:
/// - Blocks partition the source: first starts at 0, each ends where the
///   next starts, the last ends at the source length
/// - Every span's raw text is the source slice it claims
/// - Content spans sit inside their block spans
/// - Inline nodes tile their block's content, and wrapped children their parent
/// - Concatenating the blocks reproduces the source
pub fn check_document(doc: &Document) -> Result<(), InvariantError> {
    let source = doc.source();
    let blocks = doc.blocks();

    if let Some(first) = blocks.first() {
        if first.span.start != 0 {
            return Err(InvariantError::FirstBlockOffset(first.span.start));
        }
    }
    for (index, pair) in blocks.windows(2).enumerate() {
        if pair[0].span.end != pair[1].span.start {
            return Err(InvariantError::NotContiguous {
                index,
                end: pair[0].span.end,
                next_start: pair[1].span.start,
            });
        }
    }
    let end = blocks.last().map_or(0, |b| b.span.end);
    if end != source.len() {
        return Err(InvariantError::Coverage {
            end,
            len: source.len(),
        });
    }

    for (index, block) in blocks.iter().enumerate() {
        check_raw_text(source, &block.span, || format!("block {index}"))?;
        check_raw_text(source, &block.content_span, || format!("block {index} content"))?;

        let (content, span) = (block.content_span.range(), block.span.range());
        if content.start < span.start || content.end > span.end {
            return Err(InvariantError::ContentOutsideBlock {
                index,
                content,
                span,
            });
        }

        if block.kind().has_inline_content() {
            check_tiling(source, block.inlines(), content, index)?;
        }
    }

    if doc.to_source() != source {
        return Err(InvariantError::RoundTrip);
    }
    Ok(())
}

fn check_raw_text(
    source: &str,
    span: &crate::ast::SourceSpan,
    what: impl FnOnce() -> String,
) -> Result<(), InvariantError> {
    if source.get(span.range()) == Some(span.raw_text.as_str()) {
        Ok(())
    } else {
        Err(InvariantError::RawText {
            what: what(),
            start: span.start,
            end: span.end,
        })
    }
}

/// `nodes` must cover `range` end to end, recursively for wrapped children.
fn check_tiling(
    source: &str,
    nodes: &[InlineNode],
    range: Range<usize>,
    index: usize,
) -> Result<(), InvariantError> {
    let mut offset = range.start;
    for node in nodes {
        check_raw_text(source, &node.span, || format!("inline in block {index}"))?;
        if node.span.start != offset {
            return Err(InvariantError::InlineTiling { index, offset });
        }
        let children = node.children();
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            check_tiling(source, children, first.span.start..last.span.end, index)?;
            if first.span.start < node.span.start || last.span.end > node.span.end {
                return Err(InvariantError::InlineTiling {
                    index,
                    offset: first.span.start,
                });
            }
        }
        offset = node.span.end;
    }
    if offset != range.end {
        return Err(InvariantError::InlineTiling { index, offset });
    }
    Ok(())
}

/// Validates a rendered forest against the document it was rendered from:
/// one rendered block per block, each spelling out the block's raw text.
pub fn check_render(doc: &Document, forest: &[RenderedBlock]) -> Result<(), InvariantError> {
    if forest.len() != doc.blocks().len() {
        return Err(InvariantError::RenderCount {
            rendered: forest.len(),
            blocks: doc.blocks().len(),
        });
    }
    for (index, (rendered, block)) in forest.iter().zip(doc.blocks()).enumerate() {
        if rendered.block_index != index || rendered.leaf_text() != block.span.raw_text {
            return Err(InvariantError::RenderText { index });
        }
    }
    Ok(())
}
