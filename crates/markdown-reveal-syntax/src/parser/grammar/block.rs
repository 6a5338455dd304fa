//! Block-level grammar rules.
//!
//! [`block`] runs at the start of a line and tries each production in
//! priority order; the first one that recognises the line wins.
//!
//! | Priority | Production | Shape |
//! |----------|------------|-------|
//! | 1 | blank line | whitespace only |
//! | 2 | ATX heading | `#`..`######` then space or end of line |
//! | 3 | fenced code | three or more `` ` `` or `~`, up to a matching close |
//! | 4 | math block | `$$` line, up to the next `$$` line |
//! | 5 | table | row with `\|`, then a delimiter row |
//! | 6 | thematic break | three or more `-`, `*` or `_` |
//! | 7 | blockquote | `>` prefix, one line |
//! | 8 | list item | `-`/`*`/`+` or `1.`/`1)`, optional `[ ]`, one line |
//! | 9 | setext heading | paragraph lines over a `===` / `---` underline |
//! | 10 | footnote definition | `[^id]: text` |
//! | 11 | table of contents | `[TOC]` or `[[toc]]` |
//! | 12 | paragraph | anything else |
//!
//! Every production consumes through the line terminator of its last line
//! (or to end of input), so blocks tile the source with no gaps.

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::table::parse_delimiter_row;

use super::{footnote_label_len, inline, run_len};

/// Parse a block element.
pub(super) fn block(p: &mut Parser<'_, '_>) {
    let ext = p.extensions();

    let matched = blank_line(p)
        || atx_heading(p)
        || fenced_code(p)
        || (ext.math && math_block(p))
        || table(p)
        || thematic_break(p)
        || blockquote(p)
        || list_item(p)
        || setext_heading(p)
        || (ext.footnotes && footnote_definition(p))
        || (ext.table_of_contents && table_of_contents(p));

    if !matched {
        paragraph(p);
    }
}

fn blank_line(p: &mut Parser<'_, '_>) -> bool {
    if !p.is_blank_line(0) {
        return false;
    }

    let m = p.start();
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::BLANK_LINE);
    true
}

/// Returns the marker length: the hashes plus one following whitespace token.
fn scan_atx_heading(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let hashes = run_len(p, at, SyntaxKind::HASH);
    if !(1..=6).contains(&hashes) {
        return None;
    }
    match p.nth(at + hashes) {
        SyntaxKind::WHITESPACE => Some(hashes + 1),
        SyntaxKind::NEWLINE | SyntaxKind::EOF => Some(hashes),
        _ => None,
    }
}

fn atx_heading(p: &mut Parser<'_, '_>) -> bool {
    let Some(marker) = scan_atx_heading(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(marker, SyntaxKind::MARKER);
    inline::inline_line(p);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::ATX_HEADING);
    true
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    kind: SyntaxKind,
    len: usize,
}

fn scan_fence_open(p: &Parser<'_, '_>, at: usize) -> Option<Fence> {
    let kind = p.nth(at);
    if !matches!(kind, SyntaxKind::BACKTICK | SyntaxKind::TILDE) {
        return None;
    }
    let len = run_len(p, at, kind);
    if len < 3 {
        return None;
    }
    // A backtick in the info string would make the line ambiguous with code spans
    if kind == SyntaxKind::BACKTICK && p.line_contains(at + len, SyntaxKind::BACKTICK) {
        return None;
    }
    Some(Fence { kind, len })
}

/// A closing fence: at least as long as the opener, nothing after but whitespace.
fn scan_fence_close(p: &Parser<'_, '_>, at: usize, fence: Fence) -> Option<usize> {
    let len = run_len(p, at, fence.kind);
    (len >= fence.len && p.is_blank_line(at + len)).then_some(len)
}

fn scan_math_fence(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    (run_len(p, at, SyntaxKind::DOLLAR) == 2 && p.is_blank_line(at + 2)).then_some(2)
}

fn fenced_code(p: &mut Parser<'_, '_>) -> bool {
    let Some(fence) = scan_fence_open(p, 0) else {
        return false;
    };
    fenced(p, fence.len, SyntaxKind::FENCED_CODE, |p, at| {
        scan_fence_close(p, at, fence)
    });
    true
}

fn math_block(p: &mut Parser<'_, '_>) -> bool {
    let Some(open) = scan_math_fence(p, 0) else {
        return false;
    };
    fenced(p, open, SyntaxKind::MATH_BLOCK, scan_math_fence);
    true
}

/// Shared shape of fenced code and math blocks:
/// `MARKER [WHITESPACE] [INFO_STRING] NEWLINE [CODE_TEXT] [MARKER [WHITESPACE] [NEWLINE]]`.
///
/// Without a closing line the body runs to end of input.
fn fenced(
    p: &mut Parser<'_, '_>,
    open: usize,
    kind: SyntaxKind,
    close: impl Fn(&Parser<'_, '_>, usize) -> Option<usize>,
) {
    let m = p.start();
    p.bump_n(open, SyntaxKind::MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    let info = p.line_len(0);
    p.bump_n(info, SyntaxKind::INFO_STRING);

    if p.eat(SyntaxKind::NEWLINE) {
        let mut line = 0;
        let closing = loop {
            if let Some(len) = close(p, line) {
                break Some((line, len));
            }
            match p.next_line(line) {
                Some(next) => line = next,
                None => break None,
            }
        };

        let body = match closing {
            Some((at, _)) => at,
            None => line + p.line_len(line),
        };
        p.bump_n(body, SyntaxKind::CODE_TEXT);

        if let Some((_, len)) = closing {
            p.bump_n(len, SyntaxKind::MARKER);
            p.eat(SyntaxKind::WHITESPACE);
            p.eat(SyntaxKind::NEWLINE);
        }
    }

    m.complete(p, kind);
}

/// A header line with a pipe followed by a valid delimiter row.
fn scan_table(p: &Parser<'_, '_>, at: usize) -> bool {
    if p.is_blank_line(at) || !p.line_contains(at, SyntaxKind::PIPE) {
        return false;
    }
    let Some(delimiter) = p.next_line(at) else {
        return false;
    };
    let row = p.text_of(delimiter, p.line_len(delimiter));
    parse_delimiter_row(&row).is_some()
}

fn is_table_body_row(p: &Parser<'_, '_>, at: usize) -> bool {
    !p.is_blank_line(at) && p.line_contains(at, SyntaxKind::PIPE) && !interrupts_paragraph(p, at)
}

fn table(p: &mut Parser<'_, '_>) -> bool {
    if !scan_table(p, 0) {
        return false;
    }

    let header = table_row(p, SyntaxKind::TABLE_ROW);
    let m = header.precede(p);
    table_row(p, SyntaxKind::TABLE_DELIMITER_ROW);
    while !p.at_end() && is_table_body_row(p, 0) {
        table_row(p, SyntaxKind::TABLE_ROW);
    }
    m.complete(p, SyntaxKind::TABLE);
    true
}

/// One table line as raw tokens; cells are split by the AST builder.
fn table_row(p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    for _ in 0..p.line_len(0) {
        p.bump();
    }
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, kind)
}

/// Returns the number of tokens on the line, all part of the break.
fn scan_thematic_break(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let kind = p.nth(at);
    if !matches!(
        kind,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
    ) {
        return None;
    }

    let len = p.line_len(at);
    let mut count = 0;
    for i in at..at + len {
        match p.nth(i) {
            k if k == kind => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return None,
        }
    }
    (count >= 3).then_some(len)
}

fn thematic_break(p: &mut Parser<'_, '_>) -> bool {
    let Some(len) = scan_thematic_break(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(len, SyntaxKind::MARKER);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::THEMATIC_BREAK);
    true
}

/// Returns the prefix length: one or more `>`, each with optional whitespace.
fn scan_blockquote(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let mut i = at;
    while p.nth(i) == SyntaxKind::GT {
        i += 1;
        if p.nth(i) == SyntaxKind::WHITESPACE {
            i += 1;
        }
    }
    (i > at).then_some(i - at)
}

fn blockquote(p: &mut Parser<'_, '_>) -> bool {
    let Some(prefix) = scan_blockquote(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(prefix, SyntaxKind::MARKER);
    inline::inline_line(p);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::BLOCK_QUOTE);
    true
}

/// Token counts of each part of a list item prefix.
#[derive(Debug, Clone, Copy)]
struct ListItemScan {
    indent: usize,
    marker: usize,
    ordered: bool,
    starts_at_one: bool,
    space: usize,
    task: usize,
    task_space: usize,
}

impl ListItemScan {
    /// Empty items and ordered items not numbered 1 cannot interrupt a
    /// paragraph, so `2024. was a year` stays prose.
    fn can_interrupt_paragraph(&self) -> bool {
        self.space > 0 && (!self.ordered || self.starts_at_one)
    }
}

fn scan_list_item(p: &Parser<'_, '_>, at: usize) -> Option<ListItemScan> {
    let indent = usize::from(p.nth(at) == SyntaxKind::WHITESPACE);
    let i = at + indent;

    let (marker, ordered) = match p.nth(i) {
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS => (1, false),
        SyntaxKind::DIGITS
            if p.nth_text(i).len() <= 9
                && matches!(p.nth(i + 1), SyntaxKind::DOT | SyntaxKind::RPAREN) =>
        {
            (2, true)
        }
        _ => return None,
    };

    let after_marker = i + marker;
    let space = match p.nth(after_marker) {
        SyntaxKind::WHITESPACE => 1,
        SyntaxKind::NEWLINE | SyntaxKind::EOF => 0,
        _ => return None,
    };

    let checkbox = after_marker + space;
    let (task, task_space) = if space == 1 && is_task_box(p, checkbox) {
        match p.nth(checkbox + 3) {
            SyntaxKind::WHITESPACE => (3, 1),
            SyntaxKind::NEWLINE | SyntaxKind::EOF => (3, 0),
            _ => (0, 0),
        }
    } else {
        (0, 0)
    };

    Some(ListItemScan {
        indent,
        marker,
        ordered,
        starts_at_one: ordered && p.nth_text(i) == "1",
        space,
        task,
        task_space,
    })
}

/// `[ ]`, `[x]` or `[X]`.
fn is_task_box(p: &Parser<'_, '_>, at: usize) -> bool {
    if p.nth(at) != SyntaxKind::LBRACKET || p.nth(at + 2) != SyntaxKind::RBRACKET {
        return false;
    }
    match p.nth(at + 1) {
        SyntaxKind::WHITESPACE => p.nth_text(at + 1) == " ",
        SyntaxKind::TEXT => matches!(p.nth_text(at + 1), "x" | "X"),
        _ => false,
    }
}

fn list_item(p: &mut Parser<'_, '_>) -> bool {
    let Some(scan) = scan_list_item(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(scan.indent, SyntaxKind::INDENT);
    p.bump_n(scan.marker, SyntaxKind::MARKER);
    p.bump_n(scan.space, SyntaxKind::WHITESPACE);
    p.bump_n(scan.task, SyntaxKind::TASK);
    p.bump_n(scan.task_space, SyntaxKind::WHITESPACE);
    inline::inline_line(p);
    p.eat(SyntaxKind::NEWLINE);

    let kind = if scan.ordered {
        SyntaxKind::ORDERED_LIST_ITEM
    } else {
        SyntaxKind::BULLET_LIST_ITEM
    };
    m.complete(p, kind);
    true
}

/// `===` or `---` (any length), optionally followed by whitespace.
fn scan_setext_underline(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let kind = p.nth(at);
    if !matches!(kind, SyntaxKind::EQ | SyntaxKind::DASH) {
        return None;
    }
    let run = run_len(p, at, kind);
    let ws = usize::from(p.nth(at + run) == SyntaxKind::WHITESPACE);
    matches!(p.nth(at + run + ws), SyntaxKind::NEWLINE | SyntaxKind::EOF).then_some(run + ws)
}

/// Lines in a paragraph-like run, and the underline that ends it, if any.
struct ParagraphScan {
    /// Tokens up to (not including) the last line's terminator
    content: usize,
    /// Length of the setext underline starting right after that terminator
    underline: Option<usize>,
}

fn scan_paragraph(p: &Parser<'_, '_>) -> ParagraphScan {
    let mut line = 0;
    loop {
        let content = line + p.line_len(line);
        let Some(next) = p.next_line(line) else {
            return ParagraphScan {
                content,
                underline: None,
            };
        };

        // An underline wins over a thematic break or list item on the next line
        if let Some(underline) = scan_setext_underline(p, next) {
            return ParagraphScan {
                content,
                underline: Some(underline),
            };
        }
        if p.is_blank_line(next) || interrupts_paragraph(p, next) {
            return ParagraphScan {
                content,
                underline: None,
            };
        }
        line = next;
    }
}

fn interrupts_paragraph(p: &Parser<'_, '_>, at: usize) -> bool {
    let ext = p.extensions();

    scan_atx_heading(p, at).is_some()
        || scan_fence_open(p, at).is_some()
        || (ext.math && scan_math_fence(p, at).is_some())
        || scan_table(p, at)
        || scan_thematic_break(p, at).is_some()
        || scan_blockquote(p, at).is_some()
        || scan_list_item(p, at).is_some_and(|item| item.can_interrupt_paragraph())
        || (ext.footnotes && scan_footnote_definition(p, at).is_some())
        || (ext.table_of_contents && scan_table_of_contents(p, at).is_some())
}

fn setext_heading(p: &mut Parser<'_, '_>) -> bool {
    let ParagraphScan {
        content,
        underline: Some(underline),
    } = scan_paragraph(p)
    else {
        return false;
    };

    let m = p.start();
    inline::inline_content(p, content);
    p.bump();
    p.bump_n(underline, SyntaxKind::MARKER);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::SETEXT_HEADING);
    true
}

/// Returns the label length of `[^label]:`.
fn scan_footnote_definition(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let label = footnote_label_len(p, at)?;
    (p.nth(at + 3 + label) == SyntaxKind::COLON).then_some(label)
}

fn footnote_definition(p: &mut Parser<'_, '_>) -> bool {
    let Some(label) = scan_footnote_definition(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(2, SyntaxKind::MARKER);
    p.bump_n(label, SyntaxKind::LABEL);
    p.bump_n(2, SyntaxKind::MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_line(p);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::FOOTNOTE_DEFINITION);
    true
}

/// `[TOC]` or `[[toc]]`, any case, alone on its line.
fn scan_table_of_contents(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let is_toc =
        |i: usize| p.nth(i) == SyntaxKind::TEXT && p.nth_text(i).eq_ignore_ascii_case("toc");

    let len = if p.nth(at) != SyntaxKind::LBRACKET {
        return None;
    } else if is_toc(at + 1) && p.nth(at + 2) == SyntaxKind::RBRACKET {
        3
    } else if p.nth(at + 1) == SyntaxKind::LBRACKET
        && is_toc(at + 2)
        && p.nth(at + 3) == SyntaxKind::RBRACKET
        && p.nth(at + 4) == SyntaxKind::RBRACKET
    {
        5
    } else {
        return None;
    };

    p.is_blank_line(at + len).then_some(len)
}

fn table_of_contents(p: &mut Parser<'_, '_>) -> bool {
    let Some(len) = scan_table_of_contents(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(len, SyntaxKind::MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::TABLE_OF_CONTENTS);
    true
}

/// Parse a paragraph (the catch-all block).
fn paragraph(p: &mut Parser<'_, '_>) {
    let ParagraphScan { content, .. } = scan_paragraph(p);

    let m = p.start();
    inline::inline_content(p, content);
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::PARAGRAPH);
}
