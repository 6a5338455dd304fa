//! Property-based tests for the parse → render pipeline
//!
//! For any input string:
//! - Concatenating block raw text reproduces the source (round trip)
//! - Blocks partition the source with no gaps or overlaps
//! - Rendered leaf text reproduces the source for every cursor position
//! - Offset lookup agrees with block spans
//! - The changed window of an edit excludes matching blocks at both ends
//! - The incremental engine's output equals a fresh render

use markdown_reveal_engine::snapshot::{check_document, check_render};
use markdown_reveal_engine::{
    Document, EngineOptions, Extensions, IncrementalEngine, RenderOutput, StyleConfig,
    active_block_for, changed_blocks, render_document,
};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "# ", "## ", "###### ", "Title", "text", "word", "12", " ", "  ", "\t", "\n", "\n\n", "\r\n",
    "**", "*", "_", "__", "***", "~~", "~", "==", "^", "$", "$$\n", "`", "``", "```\n",
    "```rust\n", "~~~\n", "[", "]", "(", ")", "](", "![", "<", ">", "> ", "- ", "* ", "+ ",
    "1. ", "2) ", "[ ] ", "[x] ", "|", "| a | b |\n", "|---|:-:|\n", "---\n", "===\n", "\\",
    ":", ":smile:", "[^1]", "[^1]: ", "[TOC]\n", "https://x.y", "\"t\"", "é", "✓",
];

/// Markdown-looking text built from syntax fragments.
fn markdown_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..48).prop_map(|parts| parts.concat())
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => markdown_strategy(),
        1 => any::<String>(),
    ]
}

fn extensions_strategy() -> impl Strategy<Value = Extensions> {
    prop_oneof![Just(Extensions::all()), Just(Extensions::none())]
}

/// Insert or delete one character at a char boundary near `at`.
fn edit(source: &str, at: usize, insert: Option<char>) -> String {
    let mut at = at.min(source.len());
    while !source.is_char_boundary(at) {
        at -= 1;
    }
    let mut edited = source.to_string();
    match insert {
        Some(c) => edited.insert(at, c),
        None if at < source.len() => {
            edited.remove(at);
        }
        None => {}
    }
    edited
}

proptest! {
    #[test]
    fn round_trip_and_partition(source in source_strategy(), ext in extensions_strategy()) {
        let doc = Document::parse_with(&source, ext);
        prop_assert_eq!(doc.to_source(), source.clone());
        prop_assert_eq!(check_document(&doc), Ok(()));
    }

    #[test]
    fn render_reproduces_source_for_any_cursor(
        source in markdown_strategy(),
        cursor in any::<prop::sample::Index>(),
    ) {
        let doc = Document::parse(&source);
        let styles = StyleConfig::default();
        for offset in [None, Some(cursor.index(source.len() + 2))] {
            let forest = render_document(&doc, active_block_for(&doc, offset), &styles);
            prop_assert_eq!(check_render(&doc, &forest), Ok(()));
            let text: String = forest.iter().map(|b| b.leaf_text()).collect();
            prop_assert_eq!(&text, &source);
        }
    }

    #[test]
    fn offsets_resolve_to_containing_block(source in markdown_strategy()) {
        let doc = Document::parse(&source);
        for (index, block) in doc.blocks().iter().enumerate() {
            for offset in block.span.range() {
                prop_assert_eq!(doc.block_index_at_offset(offset), Some(index));
            }
        }
        prop_assert_eq!(doc.block_index_at_offset(source.len() + 1), None);
    }

    #[test]
    fn changed_window_is_tight(
        source in markdown_strategy(),
        at in any::<prop::sample::Index>(),
        insert in prop::option::of(prop::sample::select(vec!['a', '*', '#', '\n', '`', '|', '-'])),
    ) {
        let edited = edit(&source, at.index(source.len() + 1), insert);
        let old = Document::parse(&source);
        let new = Document::parse(&edited);
        let changed = changed_blocks(&old, &new);
        let (old_blocks, new_blocks) = (old.blocks(), new.blocks());
        let shared = old_blocks.len().min(new_blocks.len());

        for i in 0..changed.prefix {
            prop_assert_eq!(&old_blocks[i].span.raw_text, &new_blocks[i].span.raw_text);
        }
        for i in 1..=changed.suffix {
            prop_assert_eq!(
                &old_blocks[old_blocks.len() - i].span.raw_text,
                &new_blocks[new_blocks.len() - i].span.raw_text
            );
        }
        // Neither scan stopped early
        if changed.prefix < shared {
            prop_assert_ne!(
                &old_blocks[changed.prefix].span.raw_text,
                &new_blocks[changed.prefix].span.raw_text
            );
        }
        if changed.prefix + changed.suffix < shared {
            prop_assert_ne!(
                &old_blocks[old_blocks.len() - 1 - changed.suffix].span.raw_text,
                &new_blocks[new_blocks.len() - 1 - changed.suffix].span.raw_text
            );
        }
        prop_assert_eq!(changed.range.end, new_blocks.len() - changed.suffix);
    }

    #[test]
    fn incremental_output_matches_fresh_render(
        steps in prop::collection::vec(
            (markdown_strategy(), any::<prop::sample::Index>()),
            1..6,
        ),
    ) {
        let styles = StyleConfig::default();
        let mut engine = IncrementalEngine::new(
            EngineOptions::default(),
            Extensions::all(),
            styles.clone(),
        );

        for (source, cursor) in steps {
            let cursor = Some(cursor.index(source.len() + 1));
            engine.update(&source, cursor);

            let doc = Document::parse(&source);
            let expected = render_document(&doc, active_block_for(&doc, cursor), &styles);
            match engine.output() {
                RenderOutput::Styled(forest) => prop_assert_eq!(forest, expected.as_slice()),
                RenderOutput::Deferred(run) => {
                    prop_assert!(false, "unexpected deferral: {:?}", run)
                }
            }
        }
    }
}
