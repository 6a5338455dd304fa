//! # Lexer - Tokenizing Markdown Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token**. We never skip or
//! discard characters, which is what makes round-tripping possible:
//!
//! ```
//! use markdown_reveal_syntax::lexer::lex;
//!
//! let input = "# Hello, *world*!\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are kept **minimal and context-free**. The lexer doesn't know if `*`
//! starts a list, emphasis, or a thematic break - that's the grammar's job.
//!
//! Every ASCII punctuation character is its own single-character token. The
//! ones the grammar cares about get a named kind (`STAR`, `BACKTICK`, ...),
//! the rest share `PUNCT`. This keeps delimiter matching at token granularity
//! and lets a backslash escape exactly one token.
//!
//! Everything else is grouped into runs: `TEXT` (letters and non-ASCII),
//! `DIGITS` and `WHITESPACE`.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[0-9]+")]
    Digits,

    #[token("#")]
    Hash,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("=")]
    Eq,

    #[token("^")]
    Caret,

    #[token("$")]
    Dollar,

    #[token("!")]
    Bang,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("|")]
    Pipe,

    #[token("\\")]
    Backslash,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    /// Remaining ASCII punctuation, one character per token
    #[regex(r#"["%&',/;?@{}]"#)]
    Punct,

    /// Plain text - anything that is not whitespace, a digit or ASCII punctuation
    #[regex(r"[^\s0-9!-/:-@\[-`{-~]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Digits => SyntaxKind::DIGITS,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Punct => SyntaxKind::PUNCT,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognized input (a lone `\r`, exotic whitespace) is still text
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
