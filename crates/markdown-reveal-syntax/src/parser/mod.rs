//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## Why Event-Based Parsing?
//!
//! Traditional recursive descent parsers build the tree directly during parsing.
//! This has problems:
//!
//! 1. **Deep nesting can overflow the stack** (Markdown can nest arbitrarily)
//! 2. **Backtracking is expensive** when you've already built tree nodes
//! 3. **Error recovery is tricky** when partially-built nodes exist
//!
//! Instead, we emit a flat list of **events** ([`Event`]) that describe the
//! tree structure. The [`Sink`] then builds the actual Rowan tree from events.
//!
//! ## The Event Model
//!
//! Parsing produces events like:
//! ```text
//! Open(BLOCK_QUOTE)
//! Token(MARKER, 2)
//! Open(INLINE)
//! Token(TEXT, 1)
//! Close
//! Token(NEWLINE, 1)
//! Close
//! ```
//!
//! The Sink replays these in order, calling `start_node()` for Open,
//! `token()` for Token, and `finish_node()` for Close.
//!
//! ## The Marker System
//!
//! The key innovation is the [`Marker`] type, which makes tree construction
//! **type-safe at compile time**. When you call `parser.start()`, you get a
//! `Marker`. This marker **must** be either:
//!
//! - Completed with `marker.complete(parser, KIND)` → emits Open+Close
//! - Abandoned with `marker.abandon(parser)` → removes the placeholder
//!
//! If you drop a marker without doing either, **the program panics**. This
//! prevents accidentally leaving the tree in an inconsistent state.
//!
//! ```ignore
//! let m = parser.start();           // Get a marker
//! parser.bump();                    // Consume some tokens
//! m.complete(parser, SyntaxKind::PARAGRAPH);  // MUST complete or abandon
//! ```
//!
//! ## Scan, Then Emit
//!
//! Markdown constructs share delimiter characters, so productions are tried
//! in a fixed priority order and the first match wins. Each production first
//! *scans* ahead with [`Parser::nth`] / [`Parser::nth_text`] without consuming
//! anything, and only emits events once the whole construct is known to
//! match. Nothing is ever emitted speculatively, so there is nothing to undo
//! when an alternative fails.
//!
//! ## Forward Parent Links
//!
//! Sometimes we need to wrap an already-parsed node in a new parent. The
//! `CompletedMarker::precede()` method handles this by creating a **forward
//! parent link** that the Sink resolves when building the tree.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to Rowan tree
//! - [`grammar`] - Grammar rules (root, block, inline)
//!
//! ## Public API
//!
//! The main entry points are [`parse`] and [`parse_with`]:
//!
//! ```
//! use markdown_reveal_syntax::{Extensions, parse, parse_with};
//!
//! let tree = parse("# Hello\n");
//! println!("{:#?}", tree);
//!
//! let plain = parse_with("==not highlighted==\n", Extensions::none());
//! assert_eq!(plain.text().to_string(), "==not highlighted==\n");
//! ```

pub mod event;
pub mod sink;

mod grammar;

use std::num::NonZeroU32;

use crate::extensions::Extensions;
use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, enabled extensions and
/// accumulated events. Grammar functions receive `&mut Parser` and use its
/// methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_n()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    extensions: Extensions,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>], extensions: Extensions) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            extensions,
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        Sink::new(self.tokens).build(self.events)
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Tombstone);
        Marker {
            pos,
            completed: false,
        }
    }

    /// The extensions this parse runs with.
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Index of the current token in the token stream.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, or `""` past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Kind of the token just before the current one. The start of input
    /// reads as a NEWLINE so that line-start checks need no special case.
    pub fn prev(&self) -> SyntaxKind {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].kind,
            None => SyntaxKind::NEWLINE,
        }
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token. `n == 0` is a no-op so
    /// that optional parts of a construct can be emitted unconditionally.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        if n == 0 {
            return;
        }
        let n = n.min(self.tokens.len().saturating_sub(self.pos));
        if let Some(event) = Event::glued(kind, n) {
            self.events.push(event);
            self.pos += n;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Number of tokens from lookahead offset `at` up to (not including) the
    /// next NEWLINE or the end of input.
    pub fn line_len(&self, at: usize) -> usize {
        let mut i = at;
        while !matches!(self.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            i += 1;
        }
        i - at
    }

    /// Lookahead offset of the first token of the line after the one that
    /// contains offset `at`, or `None` if that line runs to end of input.
    pub fn next_line(&self, at: usize) -> Option<usize> {
        let end = at + self.line_len(at);
        (self.nth(end) == SyntaxKind::NEWLINE).then_some(end + 1)
    }

    /// True if the line at offset `at` holds only horizontal whitespace.
    pub fn is_blank_line(&self, at: usize) -> bool {
        let ws = usize::from(self.nth(at) == SyntaxKind::WHITESPACE);
        matches!(self.nth(at + ws), SyntaxKind::NEWLINE | SyntaxKind::EOF)
    }

    /// Concatenated text of `len` tokens starting at offset `at`.
    pub fn text_of(&self, at: usize, len: usize) -> String {
        (at..at + len).map(|i| self.nth_text(i)).collect()
    }

    /// True if the line at offset `at` contains a token of `kind`.
    pub fn line_contains(&self, at: usize, kind: SyntaxKind) -> bool {
        (at..at + self.line_len(at)).any(|i| self.nth(i) == kind)
    }
}

/// A marker for a node being constructed.
///
/// This is the heart of the type-safe tree building system. When you call
/// `parser.start()`, a `Tombstone` event is pushed and you get a `Marker`
/// pointing to it.
///
/// ## The Must-Use Contract
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is either:
///
/// - **Completed** via `marker.complete(parser, KIND)` - turns the
///   tombstone into an `Open` event and pushes a `Close` event
/// - **Abandoned** via `marker.abandon(parser)` - removes the tombstone
///   (only works if nothing was pushed after it)
///
/// If you drop a marker without doing either, **the program panics**. This
/// catches bugs at runtime rather than producing corrupt trees.
///
/// ## Example
///
/// ```ignore
/// fn thematic_break(p: &mut Parser, len: usize) {
///     let m = p.start();  // Reserve a spot for the node
///
///     p.bump_n(len, SyntaxKind::MARKER);
///     p.eat(SyntaxKind::NEWLINE);
///
///     m.complete(p, SyntaxKind::THEMATIC_BREAK);  // Finalize the node
/// }
/// ```
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector of the reserved slot
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    ///
    /// This:
    /// 1. Replaces the `Tombstone` at our position with `Open { kind, .. }`
    /// 2. Pushes a `Close` event
    /// 3. Returns a `CompletedMarker` for potential `precede()` calls
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Tombstone));
        *event_at_pos = Event::open(kind);
        p.events.push(Event::Close);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// Use this when you speculatively started a node but decided not to
    /// create it (e.g., the input didn't match what you expected).
    ///
    /// **Note**: This only removes the tombstone if it's the last event.
    /// If other events were pushed after `start()`, it stays and the Sink
    /// skips it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Tombstone) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// The only thing you can do with a `CompletedMarker` is call `precede()`
/// to wrap the completed node in a new parent.
///
/// ## The Precede Pattern
///
/// A table's header line is an ordinary row until the delimiter row below it
/// turns the pair into a table:
///
/// ```ignore
/// let header = table_row(p, header_len);   // Returns CompletedMarker
///
/// let table = header.precede(p);           // Start TABLE *before* the row
/// table_delimiter_row(p);
/// body_rows(p);
/// table.complete(p, SyntaxKind::TABLE);
/// // Result: TABLE containing [TABLE_ROW, TABLE_DELIMITER_ROW, TABLE_ROW...]
/// ```
///
/// This works by setting a `parent` link that the Sink resolves.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Open event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    ///
    /// Returns a new `Marker` that, when completed, will become the parent
    /// of the node at `self.pos`.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Tombstone);

        if let Event::Open { parent, .. } = &mut p.events[self.pos] {
            *parent = u32::try_from(new_pos - self.pos)
                .ok()
                .and_then(NonZeroU32::new);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse markdown source into a syntax tree with every extension enabled.
pub fn parse(source: &str) -> SyntaxNode {
    parse_with(source, Extensions::all())
}

/// Parse markdown source into a syntax tree with the given extensions.
pub fn parse_with(source: &str, extensions: Extensions) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens, extensions);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty_input() {
        let tree = parse("");
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 0);
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "Hello, world!";
        let tree = parse(input);
        assert_eq!(tree.text(), input);
    }

    #[test]
    fn parse_simple_paragraph() {
        let input = "Hello";
        let tree = parse(input);

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        let para = tree.children().next().unwrap();
        assert_eq!(para.kind(), SyntaxKind::PARAGRAPH);
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let tokens = lex("test");
            let mut parser = Parser::new(&tokens, Extensions::all());
            let _marker = parser.start();
            // Marker dropped without completion - should panic
        });
        assert!(result.is_err());
    }

    #[test]
    fn marker_can_be_abandoned() {
        let tokens = lex("test");
        let mut parser = Parser::new(&tokens, Extensions::all());
        let marker = parser.start();
        marker.abandon(&mut parser);
        // Should not panic
    }

    #[test]
    fn lookahead_helpers() {
        let tokens = lex("ab cd\n  \nx");
        let parser = Parser::new(&tokens, Extensions::all());

        assert_eq!(parser.line_len(0), 3);
        assert_eq!(parser.next_line(0), Some(4));
        assert!(parser.is_blank_line(4));
        assert_eq!(parser.next_line(4), Some(6));
        assert_eq!(parser.next_line(6), None);
        assert_eq!(parser.text_of(0, 3), "ab cd");
        assert!(parser.line_contains(0, SyntaxKind::WHITESPACE));
        assert_eq!(parser.prev(), SyntaxKind::NEWLINE);
    }

    #[test]
    fn bump_n_zero_is_noop() {
        let tokens = lex("abc");
        let mut parser = Parser::new(&tokens, Extensions::all());
        parser.bump_n(0, SyntaxKind::MARKER);
        assert_eq!(parser.pos(), 0);
        assert!(parser.events.is_empty());
    }
}
