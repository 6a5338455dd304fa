//! # Inline-Level Grammar
//!
//! Inline constructs are the formatting within a block's text. Each position
//! tries the alternatives below in order and takes the first that matches:
//!
//! | Priority | Construct | Syntax |
//! |----------|-----------|--------|
//! | 1 | escape | `\*` |
//! | 2 | bold italic | `***x***`, `___x___` |
//! | 3 | bold, strikethrough, highlight | `**x**`, `__x__`, `~~x~~`, `==x==` |
//! | 4 | italic, subscript, superscript, math | `*x*`, `_x_`, `~x~`, `^x^`, `$x$` |
//! | 5 | code span | `` `x` ``, ``` ``x`y`` ``` |
//! | 6 | image | `![alt](url "title")` |
//! | 7 | footnote reference | `[^id]` |
//! | 8 | link | `[text](url "title")` |
//! | 9 | autolink | `<https://example.com>` |
//! | 10 | emoji | `:smile:` |
//! | 11 | text run | letters, digits and spaces |
//! | 12 | fallback | any single token |
//!
//! ## Bounded Matching
//!
//! A wrapping construct's content runs lazily up to the first closing run of
//! its own delimiter and never crosses a line. If no closer exists on the
//! line the construct fails and the opener falls through to plain text, so
//! unterminated `*emphasis` costs nothing and can never swallow the block.
//!
//! Content is flat: the text between `**` and `**` becomes one CONTENT
//! token and is not parsed again for nested constructs.
//!
//! ## Flanking
//!
//! Content must be non-empty and must not start or end with whitespace, so
//! `2 * 3 * 4` stays text. Underscores additionally refuse to open or close
//! inside a word, keeping `snake_case_name` intact.

use std::sync::LazyLock;

use regex::Regex;

use crate::extensions::Extensions;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{footnote_label_len, is_word, run_len};

static URI_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*$").expect("valid autolink regex")
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("valid email regex")
});

static EMOJI_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_+\-]*[a-z_+\-][a-z0-9_+\-]*$").expect("valid shortcode regex")
});

/// Parse the rest of the current line as inline content.
pub(super) fn inline_line(p: &mut Parser<'_, '_>) {
    let len = p.line_len(0);
    inline_content(p, len);
}

/// Parse the next `len` tokens as one INLINE node. Interior newlines (in a
/// multi-line paragraph) stay inside the node as plain tokens.
pub(super) fn inline_content(p: &mut Parser<'_, '_>, len: usize) {
    if len == 0 {
        return;
    }

    let m = p.start();
    let end = p.pos() + len;
    while p.pos() < end {
        let before = p.pos();
        inline_element(p);
        debug_assert!(
            p.pos() > before,
            "inline production made no progress at token {before}"
        );
    }
    m.complete(p, SyntaxKind::INLINE);
}

/// Parse a single inline element.
fn inline_element(p: &mut Parser<'_, '_>) {
    let matched = escape(p)
        || wrapped(p, 3)
        || wrapped(p, 2)
        || wrapped(p, 1)
        || code_span(p)
        || image(p)
        || footnote_ref(p)
        || link(p)
        || autolink(p)
        || emoji(p)
        || text_run(p);

    if !matched {
        p.bump();
    }
}

/// `\` followed by any ASCII punctuation.
fn escape(p: &mut Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::BACKSLASH) || !p.nth(1).is_punctuation() {
        return false;
    }

    let m = p.start();
    p.bump_n(1, SyntaxKind::MARKER);
    p.bump_n(1, SyntaxKind::CONTENT);
    m.complete(p, SyntaxKind::ESCAPE);
    true
}

/// Node kind for a delimiter character repeated `count` times, if enabled.
fn wrapped_kind(ext: Extensions, delim: SyntaxKind, count: usize) -> Option<SyntaxKind> {
    use SyntaxKind::*;

    match (delim, count) {
        (STAR | UNDERSCORE, 3) => Some(BOLD_ITALIC),
        (STAR | UNDERSCORE, 2) => Some(BOLD),
        (TILDE, 2) => Some(STRIKETHROUGH),
        (EQ, 2) if ext.highlight => Some(HIGHLIGHT),
        (STAR | UNDERSCORE, 1) => Some(ITALIC),
        (TILDE, 1) if ext.subscript => Some(SUBSCRIPT),
        (CARET, 1) if ext.superscript => Some(SUPERSCRIPT),
        (DOLLAR, 1) if ext.math => Some(INLINE_MATH),
        _ => None,
    }
}

/// Returns the content length between `count` opening and closing delimiters.
fn scan_wrapped(p: &Parser<'_, '_>, delim: SyntaxKind, count: usize) -> Option<usize> {
    if run_len(p, 0, delim) < count {
        return None;
    }
    let intraword = delim == SyntaxKind::UNDERSCORE;
    if intraword && is_word(p.prev()) {
        return None;
    }

    let mut close = count;
    loop {
        match p.nth(close) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => return None,
            k if k == delim && run_len(p, close, delim) >= count => break,
            _ => close += 1,
        }
    }

    let content = close - count;
    if content == 0 || p.nth(count).is_trivia() || p.nth(close - 1).is_trivia() {
        return None;
    }
    if intraword && is_word(p.nth(close + count)) {
        return None;
    }
    Some(content)
}

/// Emphasis-like constructs: `MARKER CONTENT MARKER`.
fn wrapped(p: &mut Parser<'_, '_>, count: usize) -> bool {
    let delim = p.current();
    let Some(kind) = wrapped_kind(p.extensions(), delim, count) else {
        return false;
    };
    let Some(content) = scan_wrapped(p, delim, count) else {
        return false;
    };

    let m = p.start();
    p.bump_n(count, SyntaxKind::MARKER);
    p.bump_n(content, SyntaxKind::CONTENT);
    p.bump_n(count, SyntaxKind::MARKER);
    m.complete(p, kind);
    true
}

/// Code span closed by a backtick run of exactly the opening length.
///
/// An opening run with no closer is consumed whole as literal text, so the
/// shorter runs inside it cannot open spans of their own.
fn code_span(p: &mut Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::BACKTICK) {
        return false;
    }

    let open = run_len(p, 0, SyntaxKind::BACKTICK);
    let mut i = open;
    let close = loop {
        match p.nth(i) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => break None,
            SyntaxKind::BACKTICK => {
                let run = run_len(p, i, SyntaxKind::BACKTICK);
                if run == open {
                    break Some(i);
                }
                i += run;
            }
            _ => i += 1,
        }
    };

    match close {
        Some(close) => {
            let m = p.start();
            p.bump_n(open, SyntaxKind::MARKER);
            p.bump_n(close - open, SyntaxKind::CONTENT);
            p.bump_n(open, SyntaxKind::MARKER);
            m.complete(p, SyntaxKind::CODE_SPAN);
        }
        None => {
            for _ in 0..open {
                p.bump();
            }
        }
    }
    true
}

/// Token counts of the parts of `[text](url "title")` after the opening bracket.
#[derive(Debug, Clone, Copy)]
struct LinkScan {
    text: usize,
    /// `](` plus optional whitespace
    open_dest: usize,
    url: usize,
    title_lead: usize,
    title: usize,
    /// optional whitespace plus `)`
    close: usize,
}

fn scan_link(p: &Parser<'_, '_>, at: usize) -> Option<LinkScan> {
    if p.nth(at) != SyntaxKind::LBRACKET {
        return None;
    }

    let mut i = at + 1;
    while !matches!(
        p.nth(i),
        SyntaxKind::RBRACKET | SyntaxKind::LBRACKET | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        i += 1;
    }
    if p.nth(i) != SyntaxKind::RBRACKET || p.nth(i + 1) != SyntaxKind::LPAREN {
        return None;
    }
    let text = i - (at + 1);
    i += 2;

    let open_dest = 2 + usize::from(p.nth(i) == SyntaxKind::WHITESPACE);
    i += open_dest - 2;

    let url_start = i;
    while !matches!(
        p.nth(i),
        SyntaxKind::WHITESPACE | SyntaxKind::RPAREN | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        i += 1;
    }
    let url = i - url_start;

    let (title_lead, title) = match p.nth(i) {
        SyntaxKind::WHITESPACE => scan_title(p, i + 1).map_or((0, 0), |len| (1, len)),
        _ => (0, 0),
    };
    i += title_lead + title;

    let trailing = usize::from(p.nth(i) == SyntaxKind::WHITESPACE);
    if p.nth(i + trailing) != SyntaxKind::RPAREN {
        return None;
    }

    Some(LinkScan {
        text,
        open_dest,
        url,
        title_lead,
        title,
        close: trailing + 1,
    })
}

/// A `"..."` or `'...'` title, quotes included.
fn scan_title(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    let quote = p.nth_text(at);
    if p.nth(at) != SyntaxKind::PUNCT || !matches!(quote, "\"" | "'") {
        return None;
    }

    let mut i = at + 1;
    loop {
        match p.nth(i) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => return None,
            SyntaxKind::PUNCT if p.nth_text(i) == quote => return Some(i + 1 - at),
            _ => i += 1,
        }
    }
}

/// `open CONTENT MARKER URL [MARKER TITLE] MARKER`, where `open` is `[` or `![`.
fn emit_link(p: &mut Parser<'_, '_>, open: usize, scan: LinkScan, kind: SyntaxKind) {
    let m = p.start();
    p.bump_n(open, SyntaxKind::MARKER);
    p.bump_n(scan.text, SyntaxKind::CONTENT);
    p.bump_n(scan.open_dest, SyntaxKind::MARKER);
    p.bump_n(scan.url, SyntaxKind::URL);
    p.bump_n(scan.title_lead, SyntaxKind::MARKER);
    p.bump_n(scan.title, SyntaxKind::TITLE);
    p.bump_n(scan.close, SyntaxKind::MARKER);
    m.complete(p, kind);
}

fn image(p: &mut Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::BANG) {
        return false;
    }
    let Some(scan) = scan_link(p, 1) else {
        return false;
    };
    emit_link(p, 2, scan, SyntaxKind::IMAGE);
    true
}

fn link(p: &mut Parser<'_, '_>) -> bool {
    let Some(scan) = scan_link(p, 0) else {
        return false;
    };
    emit_link(p, 1, scan, SyntaxKind::LINK);
    true
}

/// `[^label]`
fn footnote_ref(p: &mut Parser<'_, '_>) -> bool {
    if !p.extensions().footnotes {
        return false;
    }
    let Some(label) = footnote_label_len(p, 0) else {
        return false;
    };

    let m = p.start();
    p.bump_n(2, SyntaxKind::MARKER);
    p.bump_n(label, SyntaxKind::LABEL);
    p.bump_n(1, SyntaxKind::MARKER);
    m.complete(p, SyntaxKind::FOOTNOTE_REF);
    true
}

/// `<scheme:target>` or `<user@example.com>`
fn autolink(p: &mut Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::LT) {
        return false;
    }

    let mut i = 1;
    while !matches!(
        p.nth(i),
        SyntaxKind::GT
            | SyntaxKind::LT
            | SyntaxKind::WHITESPACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EOF
    ) {
        i += 1;
    }
    if p.nth(i) != SyntaxKind::GT || i == 1 {
        return false;
    }

    let target = p.text_of(1, i - 1);
    if !URI_AUTOLINK.is_match(&target) && !EMAIL_AUTOLINK.is_match(&target) {
        return false;
    }

    let m = p.start();
    p.bump_n(1, SyntaxKind::MARKER);
    p.bump_n(i - 1, SyntaxKind::URL);
    p.bump_n(1, SyntaxKind::MARKER);
    m.complete(p, SyntaxKind::AUTOLINK);
    true
}

/// `:shortcode:` not glued to a preceding word (so `10:30:00` stays text).
fn emoji(p: &mut Parser<'_, '_>) -> bool {
    if !p.extensions().emoji || !p.at(SyntaxKind::COLON) || is_word(p.prev()) {
        return false;
    }

    let mut i = 1;
    while matches!(
        p.nth(i),
        SyntaxKind::TEXT
            | SyntaxKind::DIGITS
            | SyntaxKind::UNDERSCORE
            | SyntaxKind::PLUS
            | SyntaxKind::DASH
    ) {
        i += 1;
    }
    if i == 1 || p.nth(i) != SyntaxKind::COLON {
        return false;
    }
    if !EMOJI_SHORTCODE.is_match(&p.text_of(1, i - 1)) {
        return false;
    }

    let m = p.start();
    p.bump_n(1, SyntaxKind::MARKER);
    p.bump_n(i - 1, SyntaxKind::CONTENT);
    p.bump_n(1, SyntaxKind::MARKER);
    m.complete(p, SyntaxKind::EMOJI);
    true
}

/// Letters, digits and spaces never start a construct; take them in one go.
fn text_run(p: &mut Parser<'_, '_>) -> bool {
    let is_text = |k: SyntaxKind| {
        matches!(
            k,
            SyntaxKind::TEXT | SyntaxKind::WHITESPACE | SyntaxKind::DIGITS
        )
    };
    if !is_text(p.current()) {
        return false;
    }
    while is_text(p.current()) {
        p.bump();
    }
    true
}
