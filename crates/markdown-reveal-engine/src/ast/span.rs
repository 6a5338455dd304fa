use std::ops::Range;

/// A byte range `[start, end)` into the document source, with the text it
/// covers.
///
/// Every node carries one, so slicing the source with any span reproduces
/// the exact bytes the node was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
    /// `source[start..end]`
    pub raw_text: String,
}

impl SourceSpan {
    /// Slices `source` at `range`.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds or not on char boundaries; ranges
    /// come from the syntax tree, which always satisfies both.
    pub fn new(source: &str, range: Range<usize>) -> Self {
        Self {
            raw_text: source[range.clone()].to_string(),
            start: range.start,
            end: range.end,
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Half-open containment: `start <= offset < end`.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_source() {
        let span = SourceSpan::new("# Hello\n", 2..7);
        assert_eq!(span.raw_text, "Hello");
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn containment_is_half_open() {
        let span = SourceSpan::new("abcdef", 1..3);
        assert!(!span.contains(0));
        assert!(span.contains(1));
        assert!(span.contains(2));
        assert!(!span.contains(3));
    }

    #[test]
    fn empty_span() {
        let span = SourceSpan::new("abc", 3..3);
        assert!(span.is_empty());
        assert_eq!(span.raw_text, "");
    }
}
