//! # markdown-reveal-syntax
//!
//! A lossless Markdown syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Lossless CST?
//!
//! Unlike an Abstract Syntax Tree (AST) which discards formatting details, a
//! Concrete Syntax Tree (CST) preserves **every byte** of the original source.
//! For a live-preview editor that matters twice over: the delimiters we hide
//! are still in the document, and the cursor must map to the exact byte under
//! it whether the syntax is shown or not.
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer uses [Logos] to tokenize input into a flat sequence of tokens.
//! Every character becomes part of some token - nothing is discarded.
//!
//! ```text
//! "# Hello\n" → [HASH, WHITESPACE, TEXT("Hello"), NEWLINE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The grammar is an ordered choice: at each position the alternatives are
//! tried in a fixed priority order and the first match wins. Productions
//! scan ahead before emitting **events** (Open, Token, Close), so a failed
//! alternative leaves nothing behind. Runs of raw tokens are folded into
//! typed composite tokens such as `MARKER` (hidden syntax) and `CONTENT`.
//!
//! ```text
//! Tokens → Events: [Open(ATX_HEADING), Token(MARKER, 2), Open(INLINE),
//!                   Token(TEXT, 1), Close, Token(NEWLINE, 1), Close]
//! ```
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink replays events into a Rowan green tree using
//! `GreenNodeBuilder`, gluing multi-token events into one token and
//! resolving parent links. The resulting tree is immutable and can be
//! cheaply cloned (it's reference-counted internally).
//!
//! ## Module Structure
//!
//! ```text
//! markdown-reveal-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── extensions.rs    # Optional syntax switches
//! ├── table.rs         # Pipe table row helpers
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, parse() / parse_with()
//!     ├── event.rs     # Event enum (Open, Token, Close, Tombstone)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Block-level productions in priority order
//!         └── inline.rs# Inline productions in priority order
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_reveal_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("# Hello\n");
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "# Hello\n");
//!
//! // Navigate the tree structure
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let heading = tree.children().next().unwrap();
//! assert_eq!(heading.kind(), SyntaxKind::ATX_HEADING);
//! ```

pub mod extensions;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;
pub mod table;

pub use extensions::Extensions;
pub use parser::{parse, parse_with};
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }

        result
    }

    /// Blocks are direct children of ROOT and tile the source end to end.
    fn assert_blocks_partition(tree: &SyntaxNode, input: &str) {
        let mut offset = 0;
        for block in tree.children() {
            assert!(block.kind().is_block(), "{:?} is not a block", block.kind());
            let range = block.text_range();
            assert_eq!(usize::from(range.start()), offset);
            offset = usize::from(range.end());
        }
        assert_eq!(offset, input.len());
        assert_eq!(
            tree.children_with_tokens().count(),
            tree.children().count(),
            "loose token directly under ROOT"
        );
    }

    fn fixture_test(name: &str) {
        let path = format!("{}/src/fixtures/{name}.md", env!("CARGO_MANIFEST_DIR"));
        let input = std::fs::read_to_string(&path).unwrap();

        for extensions in [Extensions::all(), Extensions::none()] {
            let tree = parse_with(&input, extensions);
            assert_eq!(tree.text().to_string(), input);
            assert_blocks_partition(&tree, &input);
        }
    }

    include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));

    #[test]
    fn snapshot_heading() {
        let tree = parse("# Hello\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..8
          ATX_HEADING@0..8
            MARKER@0..2 "# "
            INLINE@2..7
              TEXT@2..7 "Hello"
            NEWLINE@7..8 "\n"
        "##);
    }

    #[test]
    fn snapshot_bold_in_paragraph() {
        let tree = parse("Some **bold** text\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..19
          PARAGRAPH@0..19
            INLINE@0..18
              TEXT@0..4 "Some"
              WHITESPACE@4..5 " "
              BOLD@5..13
                MARKER@5..7 "**"
                CONTENT@7..11 "bold"
                MARKER@11..13 "**"
              WHITESPACE@13..14 " "
              TEXT@14..18 "text"
            NEWLINE@18..19 "\n"
        "##);
    }

    #[test]
    fn snapshot_thematic_break() {
        let tree = parse("---\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..4
          THEMATIC_BREAK@0..4
            MARKER@0..3 "---"
            NEWLINE@3..4 "\n"
        "##);
    }

    #[test]
    fn snapshot_fenced_code() {
        let tree = parse("```rust\nfn main() {}\n```\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..25
          FENCED_CODE@0..25
            MARKER@0..3 "```"
            INFO_STRING@3..7 "rust"
            NEWLINE@7..8 "\n"
            CODE_TEXT@8..21 "fn main() {}\n"
            MARKER@21..24 "```"
            NEWLINE@24..25 "\n"
        "##);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let tree = parse("");
        assert_eq!(format_tree(&tree, 0), "ROOT@0..0\n");
    }

    #[test]
    fn complex_document_block_kinds() {
        let input = r#"# Main Title

This is a paragraph with **bold** and [regular links](url).

## Code Example

```rust
fn main() {
    println!("Hello");
}
```

> A blockquote with *emphasis*.

- First item
- [ ] Second item
3. Third with `code`

| a | b |
|---|:-:|
| 1 | 2 |

---

Final paragraph.
"#;
        let tree = parse(input);
        let kinds: Vec<_> = tree
            .children()
            .map(|n| n.kind())
            .filter(|k| *k != SyntaxKind::BLANK_LINE)
            .collect();

        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ATX_HEADING,
                SyntaxKind::PARAGRAPH,
                SyntaxKind::ATX_HEADING,
                SyntaxKind::FENCED_CODE,
                SyntaxKind::BLOCK_QUOTE,
                SyntaxKind::BULLET_LIST_ITEM,
                SyntaxKind::BULLET_LIST_ITEM,
                SyntaxKind::ORDERED_LIST_ITEM,
                SyntaxKind::TABLE,
                SyntaxKind::THEMATIC_BREAK,
                SyntaxKind::PARAGRAPH,
            ]
        );
        assert_blocks_partition(&tree, input);
    }

    // === Error tolerance / messy input tests ===
    // Real-world notes are messy. These test that we produce a valid tree
    // even for garbage input, preserving all bytes.

    #[test]
    fn messy_unclosed_constructs() {
        let input = r#"# Draft notes

Also see [broken link without url

Some *half done emphasis and **more

And `unclosed code span

```python
def broken():
    # oops forgot to close the fence
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
        assert_blocks_partition(&tree, input);
        assert_eq!(
            tree.children().last().map(|n| n.kind()),
            Some(SyntaxKind::FENCED_CODE)
        );
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "Hello, world!\n",
            "# Heading\n",
            "> Quote\n",
            "- Item\n",
            "```\ncode\n```\n",
            "[link](url)\n",
            "*emphasis*\n",
            "**strong**\n",
            "`code span`\n",
            "a\r\nb\r\n\r\n",
            "\u{feff}bom and ünïcödé ✓\n",
        ];

        for input in inputs {
            let tree = parse(input);
            assert_eq!(
                tree.text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
            assert_blocks_partition(&tree, input);
        }
    }
}
