//! Optional syntax that sits on top of the base grammar.
//!
//! Tables, strikethrough and task list items are always recognised. The
//! constructs below can be switched off individually, in which case their
//! delimiters simply fall through to plain text.

/// The set of enabled grammar extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extensions {
    /// `==highlight==`
    pub highlight: bool,
    /// `~subscript~`
    pub subscript: bool,
    /// `^superscript^`
    pub superscript: bool,
    /// `$inline$` math and `$$` display blocks
    pub math: bool,
    /// `[^id]` references and `[^id]: text` definitions
    pub footnotes: bool,
    /// `:shortcode:` emoji
    pub emoji: bool,
    /// `[TOC]` / `[[toc]]` marker lines
    pub table_of_contents: bool,
}

impl Extensions {
    /// Every extension enabled.
    pub const fn all() -> Self {
        Self {
            highlight: true,
            subscript: true,
            superscript: true,
            math: true,
            footnotes: true,
            emoji: true,
            table_of_contents: true,
        }
    }

    /// The base grammar only.
    pub const fn none() -> Self {
        Self {
            highlight: false,
            subscript: false,
            superscript: false,
            math: false,
            footnotes: false,
            emoji: false,
            table_of_contents: false,
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        assert_eq!(Extensions::default(), Extensions::all());
        assert_ne!(Extensions::all(), Extensions::none());
    }
}
