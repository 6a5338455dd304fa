//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each production
//! takes a `&mut Parser` and:
//!
//! 1. Scans ahead without consuming (`p.nth()`, `p.nth_text()`, line helpers)
//! 2. Returns `false` if the construct does not match, so the next
//!    alternative in priority order gets its turn
//! 3. Otherwise builds the node (`p.start()` → consume → `complete()`) and
//!    returns `true`
//!
//! ## Module Structure
//!
//! - [`block`] - Line-oriented blocks (headings, fences, tables, lists...)
//! - [`inline`] - Inline constructs inside a block (emphasis, links, code...)
//!
//! ## Writing Grammar Rules
//!
//! A typical production looks like:
//!
//! ```ignore
//! fn blockquote(p: &mut Parser) -> bool {
//!     let Some(prefix) = scan_blockquote(p, 0) else {
//!         return false;                          // 1. Not ours
//!     };
//!     let m = p.start();                         // 2. Start a node
//!     p.bump_n(prefix, SyntaxKind::MARKER);      // 3. Fold `> ` into one token
//!     inline::inline_line(p);                    // 4. Call other grammar rules
//!     p.eat(SyntaxKind::NEWLINE);
//!     m.complete(p, SyntaxKind::BLOCK_QUOTE);    // 5. Complete the node
//!     true
//! }
//! ```
//!
//! ## Termination
//!
//! Every loop over productions checks that each iteration consumed at least
//! one token. The last alternative at both levels (paragraph for blocks,
//! single token for inlines) always consumes, so any input parses and the
//! worst case is one node per token.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
///
/// This is the entry point for parsing. It creates a ROOT node containing
/// all top-level blocks in the document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        let before = p.pos();
        block::block(p);
        debug_assert!(
            p.pos() > before,
            "block production made no progress at token {before}"
        );
    }

    m.complete(p, SyntaxKind::ROOT);
}

/// Length of the run of `kind` tokens starting at lookahead offset `at`.
fn run_len(p: &Parser<'_, '_>, at: usize, kind: SyntaxKind) -> usize {
    let mut n = 0;
    while p.nth(at + n) == kind {
        n += 1;
    }
    n
}

/// Tokens that make up words, for intraword delimiter checks.
fn is_word(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::TEXT | SyntaxKind::DIGITS)
}

/// Scans `[^label]` at `at`, returning the number of label tokens.
fn footnote_label_len(p: &Parser<'_, '_>, at: usize) -> Option<usize> {
    if p.nth(at) != SyntaxKind::LBRACKET || p.nth(at + 1) != SyntaxKind::CARET {
        return None;
    }
    let mut n = 0;
    while matches!(
        p.nth(at + 2 + n),
        SyntaxKind::TEXT | SyntaxKind::DIGITS | SyntaxKind::DASH | SyntaxKind::UNDERSCORE
    ) {
        n += 1;
    }
    (n > 0 && p.nth(at + 2 + n) == SyntaxKind::RBRACKET).then_some(n)
}
