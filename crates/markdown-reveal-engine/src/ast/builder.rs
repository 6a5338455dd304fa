//! Typed AST construction from the lossless syntax tree.
//!
//! Each block node under ROOT becomes one [`BlockNode`]; each element of a
//! block's INLINE node becomes an [`InlineNode`]. Loose tokens between inline
//! constructs (text runs, whitespace, single-token fallbacks, interior
//! newlines) are coalesced into one PlainText node per gap, so ordinary prose
//! costs one node per run rather than one per token.

use std::ops::Range;

use markdown_reveal_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, table};
use rowan::{NodeOrToken, TextRange};

use super::block::{Block, BlockNode, Task};
use super::inline::{Inline, InlineNode};
use super::span::SourceSpan;

/// Build the typed blocks for a parsed tree of `source`.
pub fn build_blocks(source: &str, root: &SyntaxNode) -> Vec<BlockNode> {
    root.children()
        .map(|node| build_block(source, &node))
        .collect()
}

fn to_range(range: TextRange) -> Range<usize> {
    usize::from(range.start())..usize::from(range.end())
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn text_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<String> {
    token(node, kind).map(|t| t.text().to_string())
}

fn markers(node: &SyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::MARKER)
        .map(|t| t.text().to_string())
        .collect()
}

fn build_block(source: &str, node: &SyntaxNode) -> BlockNode {
    let span = to_range(node.text_range());
    let content = content_range(node, &span);
    let marker = || text_of(node, SyntaxKind::MARKER).unwrap_or_default();
    let children = || build_inlines(source, node);

    let block = match node.kind() {
        SyntaxKind::BLANK_LINE => Block::BlankLine,
        SyntaxKind::ATX_HEADING => {
            let delimiter_text = marker();
            Block::Heading {
                level: delimiter_text.bytes().filter(|b| *b == b'#').count() as u8,
                delimiter_text,
                children: children(),
            }
        }
        SyntaxKind::SETEXT_HEADING => {
            let underline_text = marker();
            Block::SetextHeading {
                level: if underline_text.starts_with('=') { 1 } else { 2 },
                underline_text,
                children: children(),
            }
        }
        SyntaxKind::THEMATIC_BREAK => Block::ThematicBreak {
            marker_text: marker(),
        },
        SyntaxKind::FENCED_CODE => {
            let mut fences = markers(node).into_iter();
            Block::FencedCode {
                fence_text: fences.next().unwrap_or_default(),
                info_string: text_of(node, SyntaxKind::INFO_STRING),
                code_text: text_of(node, SyntaxKind::CODE_TEXT).unwrap_or_default(),
                closing_fence: fences.next(),
            }
        }
        SyntaxKind::MATH_BLOCK => Block::MathBlock {
            delimiter_text: marker(),
            tex: text_of(node, SyntaxKind::CODE_TEXT).unwrap_or_default(),
        },
        SyntaxKind::TABLE => build_table(node),
        SyntaxKind::BLOCK_QUOTE => Block::Blockquote {
            marker_text: marker(),
            children: children(),
        },
        SyntaxKind::BULLET_LIST_ITEM => Block::UnorderedListItem {
            marker_text: marker(),
            indent: text_of(node, SyntaxKind::INDENT).unwrap_or_default(),
            task: task(node),
            children: children(),
        },
        SyntaxKind::ORDERED_LIST_ITEM => {
            let mut number_text = marker();
            let punctuation = number_text.pop().unwrap_or('.');
            Block::OrderedListItem {
                number_text,
                punctuation,
                indent: text_of(node, SyntaxKind::INDENT).unwrap_or_default(),
                task: task(node),
                children: children(),
            }
        }
        SyntaxKind::FOOTNOTE_DEFINITION => Block::FootnoteDefinition {
            label: text_of(node, SyntaxKind::LABEL).unwrap_or_default(),
            children: children(),
        },
        SyntaxKind::TABLE_OF_CONTENTS => Block::TableOfContents {
            marker_text: marker(),
        },
        // PARAGRAPH, and the catch-all for anything the grammar adds later
        _ => Block::Paragraph {
            children: children(),
        },
    };

    BlockNode {
        span: SourceSpan::new(source, span),
        content_span: SourceSpan::new(source, content),
        block,
    }
}

/// The part of a block that renders as content; see [`BlockNode`].
fn content_range(node: &SyntaxNode, span: &Range<usize>) -> Range<usize> {
    let empty_at = |at: usize| at..at;

    match node.kind() {
        SyntaxKind::BLANK_LINE | SyntaxKind::TABLE => span.clone(),
        SyntaxKind::THEMATIC_BREAK | SyntaxKind::TABLE_OF_CONTENTS => {
            token(node, SyntaxKind::MARKER).map_or(span.clone(), |t| to_range(t.text_range()))
        }
        SyntaxKind::FENCED_CODE | SyntaxKind::MATH_BLOCK => {
            match token(node, SyntaxKind::CODE_TEXT) {
                Some(code) => to_range(code.text_range()),
                // Empty body: it sits right after the opening line
                None => empty_at(
                    token(node, SyntaxKind::NEWLINE)
                        .map_or(span.end, |t| usize::from(t.text_range().end())),
                ),
            }
        }
        _ => match node.children().find(|n| n.kind() == SyntaxKind::INLINE) {
            Some(inline) => to_range(inline.text_range()),
            None => empty_at(
                token(node, SyntaxKind::NEWLINE)
                    .map_or(span.end, |t| usize::from(t.text_range().start())),
            ),
        },
    }
}

fn task(node: &SyntaxNode) -> Option<Task> {
    text_of(node, SyntaxKind::TASK).map(|marker_text| Task {
        checked: matches!(marker_text.as_bytes().get(1), Some(b'x' | b'X')),
        marker_text,
    })
}

fn row_cells(row: &SyntaxNode) -> Vec<String> {
    let text = row.text().to_string();
    table::split_row(text.trim_end_matches(['\r', '\n']))
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn build_table(node: &SyntaxNode) -> Block {
    let mut header_row = Vec::new();
    let mut alignments = Vec::new();
    let mut body_rows = Vec::new();

    for (i, row) in node.children().enumerate() {
        match row.kind() {
            SyntaxKind::TABLE_DELIMITER_ROW => {
                let text = row.text().to_string();
                alignments = table::parse_delimiter_row(text.trim_end_matches(['\r', '\n']))
                    .unwrap_or_default();
            }
            _ if i == 0 => header_row = row_cells(&row),
            _ => body_rows.push(row_cells(&row)),
        }
    }

    Block::Table {
        header_row,
        alignments,
        body_rows,
    }
}

fn plain_text(source: &str, range: Range<usize>) -> InlineNode {
    let span = SourceSpan::new(source, range);
    InlineNode {
        inline: Inline::PlainText {
            text: span.raw_text.clone(),
        },
        span,
    }
}

fn build_inlines(source: &str, block: &SyntaxNode) -> Vec<InlineNode> {
    let Some(inline) = block.children().find(|n| n.kind() == SyntaxKind::INLINE) else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    let mut pending: Option<Range<usize>> = None;
    for element in inline.children_with_tokens() {
        let range = to_range(element.text_range());
        match element {
            NodeOrToken::Token(_) => {
                pending = Some(match pending {
                    Some(run) => run.start..range.end,
                    None => range,
                });
            }
            NodeOrToken::Node(node) => {
                if let Some(run) = pending.take() {
                    nodes.push(plain_text(source, run));
                }
                nodes.push(build_inline(source, &node));
            }
        }
    }
    if let Some(run) = pending {
        nodes.push(plain_text(source, run));
    }
    nodes
}

fn build_inline(source: &str, node: &SyntaxNode) -> InlineNode {
    let span = SourceSpan::new(source, to_range(node.text_range()));
    let marker = || text_of(node, SyntaxKind::MARKER).unwrap_or_default();
    let content = || text_of(node, SyntaxKind::CONTENT).unwrap_or_default();
    // Wrapped content is kept flat: a single PlainText child
    let wrapped = || -> Vec<InlineNode> {
        token(node, SyntaxKind::CONTENT)
            .map(|t| plain_text(source, to_range(t.text_range())))
            .into_iter()
            .collect()
    };
    let title = || {
        text_of(node, SyntaxKind::TITLE)
            .map(|t| t.get(1..t.len().saturating_sub(1)).unwrap_or_default().to_string())
    };

    let inline = match node.kind() {
        SyntaxKind::BOLD_ITALIC => Inline::BoldItalic {
            delimiter_text: marker(),
            children: wrapped(),
        },
        SyntaxKind::BOLD => Inline::Bold {
            delimiter_text: marker(),
            children: wrapped(),
        },
        SyntaxKind::ITALIC => Inline::Italic {
            delimiter_text: marker(),
            children: wrapped(),
        },
        SyntaxKind::STRIKETHROUGH => Inline::Strikethrough {
            children: wrapped(),
        },
        SyntaxKind::HIGHLIGHT => Inline::Highlight {
            children: wrapped(),
        },
        SyntaxKind::SUBSCRIPT => Inline::Subscript {
            children: wrapped(),
        },
        SyntaxKind::SUPERSCRIPT => Inline::Superscript {
            children: wrapped(),
        },
        SyntaxKind::INLINE_MATH => Inline::InlineMath {
            delimiter_text: marker(),
            tex: content(),
        },
        SyntaxKind::CODE_SPAN => Inline::InlineCode {
            delimiter_text: marker(),
            code_text: content(),
        },
        SyntaxKind::LINK => Inline::Link {
            text: content(),
            url: text_of(node, SyntaxKind::URL).unwrap_or_default(),
            title: title(),
        },
        SyntaxKind::IMAGE => Inline::Image {
            alt: content(),
            url: text_of(node, SyntaxKind::URL).unwrap_or_default(),
            title: title(),
        },
        SyntaxKind::AUTOLINK => Inline::Autolink {
            url: text_of(node, SyntaxKind::URL).unwrap_or_default(),
        },
        SyntaxKind::FOOTNOTE_REF => Inline::FootnoteRef {
            label: text_of(node, SyntaxKind::LABEL).unwrap_or_default(),
        },
        SyntaxKind::EMOJI => Inline::Emoji {
            shortcode: content(),
        },
        SyntaxKind::ESCAPE => Inline::EscapedChar {
            ch: content().chars().next().unwrap_or('\\'),
        },
        _ => Inline::PlainText {
            text: span.raw_text.clone(),
        },
    };

    InlineNode { span, inline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use markdown_reveal_syntax::parse;
    use markdown_reveal_syntax::table::Alignment;
    use pretty_assertions::assert_eq;

    fn blocks(source: &str) -> Vec<BlockNode> {
        build_blocks(source, &parse(source))
    }

    fn only_block(source: &str) -> BlockNode {
        let mut blocks = blocks(source);
        assert_eq!(blocks.len(), 1, "{blocks:#?}");
        blocks.remove(0)
    }

    fn plain(text: &str, start: usize) -> InlineNode {
        plain_text(text_padded(text, start).as_str(), start..start + text.len())
    }

    /// `text` placed at byte `start` of a dummy source, for building expected nodes.
    fn text_padded(text: &str, start: usize) -> String {
        format!("{}{text}", " ".repeat(start))
    }

    #[test]
    fn heading_level_and_delimiter() {
        let block = only_block("## Hello\n");
        assert_eq!(
            block.block,
            Block::Heading {
                level: 2,
                delimiter_text: "## ".into(),
                children: vec![plain("Hello", 3)],
            }
        );
        assert_eq!(block.span.range(), 0..9);
        assert_eq!(block.content_span.range(), 3..8);
    }

    #[test]
    fn bold_in_paragraph_coalesces_text() {
        let source = "Some **bold** text\n";
        let block = only_block(source);
        let children = block.inlines();

        assert_eq!(
            children.iter().map(InlineNode::kind).collect::<Vec<_>>(),
            vec![NodeKind::PlainText, NodeKind::Bold, NodeKind::PlainText]
        );
        assert_eq!(children[0].inline, Inline::PlainText { text: "Some ".into() });
        assert_eq!(
            children[1].inline,
            Inline::Bold {
                delimiter_text: "**".into(),
                children: vec![plain("bold", 7)],
            }
        );
        assert_eq!(children[2].span.raw_text, " text");
    }

    #[test]
    fn multi_line_paragraph_is_one_text_run() {
        let block = only_block("one\ntwo three\n");
        assert_eq!(block.inlines().len(), 1);
        assert_eq!(block.inlines()[0].span.raw_text, "one\ntwo three");
    }

    #[test]
    fn thematic_break_marker() {
        let block = only_block("---\n");
        assert_eq!(
            block.block,
            Block::ThematicBreak {
                marker_text: "---".into()
            }
        );
        assert_eq!(block.content_span.raw_text, "---");
    }

    #[test]
    fn setext_levels() {
        assert_eq!(only_block("Title\n===\n").block.heading_level(), Some(1));
        assert_eq!(only_block("Title\n---\n").block.heading_level(), Some(2));
    }

    #[test]
    fn fenced_code_parts() {
        let block = only_block("~~~python\nprint(1)\n~~~\n");
        assert_eq!(
            block.block,
            Block::FencedCode {
                fence_text: "~~~".into(),
                info_string: Some("python".into()),
                code_text: "print(1)\n".into(),
                closing_fence: Some("~~~".into()),
            }
        );
        assert_eq!(block.content_span.raw_text, "print(1)\n");
    }

    #[test]
    fn unterminated_fence_has_no_closing() {
        let block = only_block("```\nstill code");
        assert!(matches!(
            block.block,
            Block::FencedCode {
                closing_fence: None,
                ..
            }
        ));
    }

    #[test]
    fn empty_fence_body_sits_after_opening_line() {
        let block = only_block("```\n```\n");
        assert_eq!(block.content_span.range(), 4..4);
    }

    #[test]
    fn list_items_with_tasks() {
        let bullet = only_block("  * [X] shipped\n");
        assert!(bullet.block.is_task());
        assert_eq!(bullet.block.task_checked(), Some(true));
        assert!(matches!(
            &bullet.block,
            Block::UnorderedListItem { marker_text, indent, .. }
                if marker_text == "*" && indent == "  "
        ));

        let ordered = only_block("12) [ ] pending\n");
        assert_eq!(ordered.block.task_checked(), Some(false));
        assert!(matches!(
            &ordered.block,
            Block::OrderedListItem { number_text, punctuation: ')', .. } if number_text == "12"
        ));

        let plain_item = only_block("- plain\n");
        assert!(!plain_item.block.is_task());
        assert_eq!(plain_item.block.task_checked(), None);
    }

    #[test]
    fn empty_list_item_content_is_before_newline() {
        let block = only_block("- \n");
        assert_eq!(block.content_span.range(), 2..2);
        assert!(block.inlines().is_empty());
    }

    #[test]
    fn table_cells_and_alignments() {
        let block = only_block("| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |\n");
        assert_eq!(
            block.block,
            Block::Table {
                header_row: vec!["a".into(), "b".into()],
                alignments: vec![Alignment::Left, Alignment::Right],
                body_rows: vec![
                    vec!["1".into(), "2".into()],
                    vec!["3".into(), "4".into()]
                ],
            }
        );
    }

    #[test]
    fn link_image_and_title() {
        let block = only_block("[site](https://x.org \"Home\") ![](pic.png)\n");
        let inlines = block.inlines();
        assert_eq!(
            inlines[0].inline,
            Inline::Link {
                text: "site".into(),
                url: "https://x.org".into(),
                title: Some("Home".into()),
            }
        );
        assert_eq!(
            inlines[2].inline,
            Inline::Image {
                alt: String::new(),
                url: "pic.png".into(),
                title: None,
            }
        );
    }

    #[test]
    fn reference_constructs() {
        let block = only_block("<https://a.b> [^n] :tada: \\* `x`\n");
        let kinds: Vec<_> = block
            .inlines()
            .iter()
            .map(InlineNode::kind)
            .filter(|k| *k != NodeKind::PlainText)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Autolink,
                NodeKind::FootnoteRef,
                NodeKind::Emoji,
                NodeKind::EscapedChar,
                NodeKind::InlineCode,
            ]
        );
        assert!(block
            .inlines()
            .iter()
            .any(|n| n.inline == Inline::EscapedChar { ch: '*' }));
    }

    #[test]
    fn footnote_definition_and_toc() {
        let blocks = blocks("[^1]: Source\n[TOC]\n$$\nx\n$$\n");
        assert_eq!(
            blocks[0].block,
            Block::FootnoteDefinition {
                label: "1".into(),
                children: vec![plain("Source", 6)],
            }
        );
        assert_eq!(
            blocks[1].block,
            Block::TableOfContents {
                marker_text: "[TOC]".into()
            }
        );
        assert_eq!(
            blocks[2].block,
            Block::MathBlock {
                delimiter_text: "$$".into(),
                tex: "x\n".into(),
            }
        );
    }

    #[test]
    fn blank_line_content_is_whole_line() {
        let blocks = blocks("a\n\n");
        assert_eq!(blocks[1].block, Block::BlankLine);
        assert_eq!(blocks[1].content_span.raw_text, "\n");
    }
}
