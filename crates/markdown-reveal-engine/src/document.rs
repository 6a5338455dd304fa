use log::debug;
use markdown_reveal_syntax::Extensions;

use crate::ast::{BlockNode, InlineNode, build_blocks};
use crate::error::EngineError;

/// A parsed document: the source text and the blocks that partition it.
///
/// Documents are never edited in place. Every change to the text produces a
/// new `Document` via [`Document::parse`], and the blocks of any document
/// concatenate back to exactly its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    blocks: Vec<BlockNode>,
    extensions: Extensions,
}

/// The block, and the deepest inline node if any, under an offset.
#[derive(Debug, Clone, Copy)]
pub struct NodeAt<'a> {
    pub block_index: usize,
    pub block: &'a BlockNode,
    pub inline: Option<&'a InlineNode>,
}

impl Document {
    /// Parse with every extension enabled.
    pub fn parse(source: &str) -> Self {
        Self::parse_with(source, Extensions::all())
    }

    pub fn parse_with(source: &str, extensions: Extensions) -> Self {
        let tree = markdown_reveal_syntax::parse_with(source, extensions);
        let blocks = build_blocks(source, &tree);
        debug!("parsed {} bytes into {} blocks", source.len(), blocks.len());
        Self {
            source: source.to_string(),
            blocks,
            extensions,
        }
    }

    /// Parse raw file contents, rejecting anything that is not UTF-8.
    pub fn parse_bytes(bytes: &[u8], extensions: Extensions) -> Result<Self, EngineError> {
        let source = std::str::from_utf8(bytes)?;
        Ok(Self::parse_with(source, extensions))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn blocks(&self) -> &[BlockNode] {
        &self.blocks
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Length of the source in bytes.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Concatenation of every block's raw text.
    pub fn to_source(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.span.raw_text.as_str())
            .collect()
    }

    /// Index of the block containing byte `offset`.
    ///
    /// Spans are half-open, except that an offset equal to the source length
    /// (a caret after the last character) belongs to the last block. Anything
    /// beyond that is `None`.
    pub fn block_index_at_offset(&self, offset: usize) -> Option<usize> {
        if offset == self.source.len() {
            return self.blocks.len().checked_sub(1);
        }
        self.blocks.iter().position(|b| b.span.contains(offset))
    }

    /// The deepest inline node of block `block_index` containing `offset`.
    pub fn inline_at_offset(&self, block_index: usize, offset: usize) -> Option<&InlineNode> {
        let block = self.blocks.get(block_index)?;
        deepest(block.inlines(), offset)
    }

    pub fn node_at_offset(&self, offset: usize) -> Option<NodeAt<'_>> {
        let block_index = self.block_index_at_offset(offset)?;
        Some(NodeAt {
            block_index,
            block: &self.blocks[block_index],
            inline: self.inline_at_offset(block_index, offset),
        })
    }

    /// Convert a character index (as hosts usually report the caret) into a
    /// byte offset. The index one past the last character maps to `len()`.
    pub fn byte_offset_for_char(&self, char_index: usize) -> Option<usize> {
        self.source
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.source.len()))
            .nth(char_index)
    }

    /// Inverse of [`Document::byte_offset_for_char`]; `None` off a char boundary.
    pub fn char_index_for_byte(&self, offset: usize) -> Option<usize> {
        self.source
            .is_char_boundary(offset)
            .then(|| self.source[..offset].chars().count())
    }
}

fn deepest(nodes: &[InlineNode], offset: usize) -> Option<&InlineNode> {
    let node = nodes.iter().find(|n| n.span.contains(offset))?;
    Some(deepest(node.children(), offset).unwrap_or(node))
}
