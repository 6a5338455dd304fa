use markdown_reveal_engine::snapshot::{check_document, check_render, normalize};
use markdown_reveal_engine::{
    Block, Document, Extensions, Inline, InlineNode, NodeKind, RenderMode, StyleConfig, StyleSlot,
    render_document,
};

#[test]
fn fixture_daily_notes() {
    let doc = assert_fixture("daily_notes");
    assert_eq!(
        block_kinds(&doc),
        vec![
            NodeKind::Heading,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
            NodeKind::BlankLine,
            NodeKind::Heading,
            NodeKind::BlankLine,
            NodeKind::UnorderedListItem,
            NodeKind::UnorderedListItem,
            NodeKind::OrderedListItem,
            NodeKind::OrderedListItem,
            NodeKind::BlankLine,
            NodeKind::Blockquote,
            NodeKind::BlankLine,
            NodeKind::ThematicBreak,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
        ]
    );

    let blocks = doc.blocks();
    let notes = inline_kinds(blocks[2].inlines());
    for kind in [NodeKind::Bold, NodeKind::InlineCode, NodeKind::Italic] {
        assert!(notes.contains(&kind), "missing {kind:?} in {notes:?}");
    }
    assert_eq!(blocks[6].block.task_checked(), Some(true));
    assert_eq!(blocks[7].block.task_checked(), Some(false));
    assert!(inline_kinds(blocks[9].inlines()).contains(&NodeKind::Strikethrough));
    assert!(inline_kinds(blocks[11].inlines()).contains(&NodeKind::BoldItalic));

    // A clock time is not an emoji shortcode
    let last = inline_kinds(blocks[15].inlines());
    assert!(!last.contains(&NodeKind::Emoji));
    assert!(last.contains(&NodeKind::Autolink));
}

#[test]
fn fixture_reference() {
    let doc = assert_fixture("reference");
    assert_eq!(
        block_kinds(&doc),
        vec![
            NodeKind::SetextHeading,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
            NodeKind::BlankLine,
            NodeKind::FencedCode,
            NodeKind::BlankLine,
            NodeKind::Table,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
            NodeKind::BlankLine,
            NodeKind::SetextHeading,
        ]
    );

    let blocks = doc.blocks();
    assert_eq!(blocks[0].block.heading_level(), Some(1));
    assert_eq!(blocks[10].block.heading_level(), Some(2));

    let links: Vec<_> = blocks[2]
        .inlines()
        .iter()
        .filter_map(|n| match &n.inline {
            Inline::Image { alt, url, title } => Some((alt.as_str(), url.as_str(), title.clone())),
            Inline::Link { text, url, title } => Some((text.as_str(), url.as_str(), title.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        vec![
            ("logo", "img/logo.png", Some("Project logo".to_string())),
            ("link", "https://example.com", Some("Home".to_string())),
        ]
    );

    match &blocks[4].block {
        Block::FencedCode {
            info_string,
            code_text,
            closing_fence,
            ..
        } => {
            assert_eq!(info_string.as_deref(), Some("rust"));
            assert!(code_text.contains("**not bold**"));
            assert_eq!(closing_fence.as_deref(), Some("```"));
        }
        other => panic!("expected fenced code, got {other:?}"),
    }

    match &blocks[6].block {
        Block::Table {
            header_row,
            body_rows,
            ..
        } => {
            assert_eq!(header_row, &["Name", "Kind", "Size"]);
            assert_eq!(body_rows.len(), 2);
            assert_eq!(body_rows[1], ["tree", "rowan", "180"]);
        }
        other => panic!("expected table, got {other:?}"),
    }

    let literal = inline_kinds(blocks[8].inlines());
    assert!(literal.contains(&NodeKind::EscapedChar));
    assert!(!literal.contains(&NodeKind::Italic));
}

#[test]
fn fixture_extensions() {
    let doc = assert_fixture("extensions");
    assert_eq!(
        block_kinds(&doc),
        vec![
            NodeKind::TableOfContents,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
            NodeKind::BlankLine,
            NodeKind::MathBlock,
            NodeKind::BlankLine,
            NodeKind::Paragraph,
            NodeKind::BlankLine,
            NodeKind::FootnoteDefinition,
            NodeKind::BlankLine,
            NodeKind::FencedCode,
        ]
    );

    let blocks = doc.blocks();
    let science = inline_kinds(blocks[2].inlines());
    for kind in [
        NodeKind::InlineMath,
        NodeKind::Subscript,
        NodeKind::Superscript,
    ] {
        assert!(science.contains(&kind), "missing {kind:?} in {science:?}");
    }
    let marked = inline_kinds(blocks[6].inlines());
    for kind in [NodeKind::Highlight, NodeKind::Emoji, NodeKind::FootnoteRef] {
        assert!(marked.contains(&kind), "missing {kind:?} in {marked:?}");
    }
    assert!(matches!(
        &blocks[10].block,
        Block::FencedCode {
            closing_fence: None,
            ..
        }
    ));

    // Switched off, the same text is still a lossless partition
    let plain = Document::parse_with(doc.source(), Extensions::none());
    assert_eq!(check_document(&plain), Ok(()));
    assert!(!block_kinds(&plain).contains(&NodeKind::MathBlock));
    assert!(!block_kinds(&plain).contains(&NodeKind::TableOfContents));
}

/// Parse a fixture, check every invariant, and render it with the cursor in
/// each block in turn.
fn assert_fixture(name: &str) -> Document {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();

    let doc = Document::parse(&md);
    assert_eq!(check_document(&doc), Ok(()), "{name}:\n{}", normalize(&doc));

    let styles = StyleConfig::default();
    for active in std::iter::once(None).chain((0..doc.blocks().len()).map(Some)) {
        let forest = render_document(&doc, active, &styles);
        assert_eq!(check_render(&doc, &forest), Ok(()), "{name} active={active:?}");
        for rendered in &forest {
            let expected = if Some(rendered.block_index) == active {
                RenderMode::Revealed
            } else {
                RenderMode::Collapsed
            };
            assert_eq!(rendered.mode, expected);
        }
    }
    doc
}

fn block_kinds(doc: &Document) -> Vec<NodeKind> {
    doc.blocks().iter().map(|b| b.kind()).collect()
}

/// Kinds of every inline node, depth first.
fn inline_kinds(nodes: &[InlineNode]) -> Vec<NodeKind> {
    let mut kinds = Vec::new();
    for node in nodes {
        kinds.push(node.kind());
        kinds.extend(inline_kinds(node.children()));
    }
    kinds
}

#[test]
fn bold_wins_over_italic() {
    let doc = Document::parse("**bold** *italic* ***both***\n");
    assert_eq!(
        inline_kinds(doc.blocks()[0].inlines()),
        vec![
            NodeKind::Bold,
            NodeKind::PlainText,
            NodeKind::PlainText,
            NodeKind::Italic,
            NodeKind::PlainText,
            NodeKind::PlainText,
            NodeKind::BoldItalic,
            NodeKind::PlainText,
        ]
    );
}

#[test]
fn double_backtick_span_keeps_single_backticks() {
    let doc = Document::parse("``a`b``\n");
    match &doc.blocks()[0].inlines()[0].inline {
        Inline::InlineCode {
            delimiter_text,
            code_text,
        } => {
            assert_eq!(delimiter_text, "``");
            assert_eq!(code_text, "a`b");
        }
        other => panic!("expected inline code, got {other:?}"),
    }
}

#[test]
fn unbalanced_delimiters_stay_text() {
    for input in ["*unterminated\n", "2 * 3 * 4\n", "snake_case_name\n", "a ** b\n"] {
        let doc = Document::parse(input);
        assert_eq!(
            inline_kinds(doc.blocks()[0].inlines()),
            vec![NodeKind::PlainText],
            "{input:?}"
        );
    }
}

#[test]
fn collapsed_block_suppresses_only_delimiters() {
    let doc = Document::parse("Some **bold** text\n");
    let forest = render_document(&doc, None, &StyleConfig::default());

    let mut leaves = Vec::new();
    for run in &forest[0].runs {
        run.for_each_leaf(&mut |text, slot, style| {
            leaves.push((text.to_string(), slot, style.opacity_percent));
        });
    }
    let hidden: Vec<_> = leaves
        .iter()
        .filter(|(_, slot, _)| *slot == StyleSlot::DelimiterSuppressed)
        .map(|(text, _, opacity)| (text.as_str(), *opacity))
        .collect();
    assert_eq!(hidden, vec![("**", 0), ("**", 0)]);
    assert!(
        leaves
            .iter()
            .any(|(text, slot, _)| text == "bold" && *slot == StyleSlot::Bold)
    );
}
