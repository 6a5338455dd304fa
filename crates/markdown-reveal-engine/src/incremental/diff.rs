use std::ops::Range;

use crate::document::Document;

/// The window of blocks that differ between two parses of an edited text.
///
/// `prefix` blocks at the front and `suffix` blocks at the back have
/// identical raw text in both documents; `range` indexes the new document's
/// blocks in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedBlocks {
    pub prefix: usize,
    pub suffix: usize,
    pub range: Range<usize>,
}

impl ChangedBlocks {
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Index in the old document of unchanged new block `index`, or `None`
    /// if the block is in the changed window.
    pub fn old_index(&self, index: usize, old_len: usize, new_len: usize) -> Option<usize> {
        if index < self.prefix {
            Some(index)
        } else if index >= self.range.end && index < new_len {
            Some(old_len - (new_len - index))
        } else {
            None
        }
    }
}

/// Compare blocks by raw text from the front and, independently, from the
/// back. The two scans never overlap, so a block is counted at most once.
pub fn changed_blocks(old: &Document, new: &Document) -> ChangedBlocks {
    let (old, new) = (old.blocks(), new.blocks());
    let shared = old.len().min(new.len());

    let prefix = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| a.span.raw_text == b.span.raw_text)
        .count();
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(shared - prefix)
        .take_while(|(a, b)| a.span.raw_text == b.span.raw_text)
        .count();

    ChangedBlocks {
        prefix,
        suffix,
        range: prefix..new.len() - suffix,
    }
}
