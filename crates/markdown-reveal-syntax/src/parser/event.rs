//! # Parser Events
//!
//! Grammar code never touches rowan. It records a flat stream of events that
//! the [`Sink`](super::sink::Sink) later replays into a green tree:
//!
//! ```text
//! Open(ATX_HEADING)
//!   Token(MARKER, 2)     `#` and ` ` glued into one token
//!   Open(INLINE)
//!     Token(TEXT, 1)
//!   Close
//!   Token(NEWLINE, 1)
//! Close
//! ```
//!
//! Two things set this stream apart from a plain open/close protocol.
//!
//! ## Glued Tokens
//!
//! The lexer splits delimiter runs into single characters, because `***` can
//! open bold and italic at once and only the grammar knows which. Once the
//! grammar has decided, the run goes into the tree as one token, so a
//! `Token` event carries the number of raw tokens it consumes. Code bodies
//! and math bodies use the same mechanism and can glue thousands.
//!
//! ## Parent Links
//!
//! [`CompletedMarker::precede`](super::CompletedMarker::precede) wraps a node
//! that is already finished, e.g. a table header row once the delimiter row
//! below it has been seen. The new parent's `Open` is appended at the end of
//! the stream and the child's `Open` records the distance forward to it.

use std::num::NonZeroU32;

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A node starts here.
    ///
    /// `parent` is the distance forward to the `Open` of a node that must
    /// enclose this one.
    Open {
        kind: SyntaxKind,
        parent: Option<NonZeroU32>,
    },

    /// The next `len` raw tokens become one tree token of `kind`.
    Token { kind: SyntaxKind, len: NonZeroU32 },

    /// The innermost open node ends.
    Close,

    /// Reserved by `Parser::start` and not (yet) an `Open`. Abandoned
    /// markers leave one behind, and the sink leaves one where it has
    /// already replayed an `Open` through a parent link.
    Tombstone,
}

impl Event {
    pub fn open(kind: SyntaxKind) -> Self {
        Event::Open { kind, parent: None }
    }

    /// One raw token, kept as is.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            len: NonZeroU32::MIN,
        }
    }

    /// `len` raw tokens glued into one. `None` when there is nothing to glue.
    pub fn glued(kind: SyntaxKind, len: usize) -> Option<Self> {
        let len = NonZeroU32::new(u32::try_from(len).unwrap_or(u32::MAX))?;
        Some(Event::Token { kind, len })
    }

    /// Raw tokens this event consumes.
    pub fn raw_len(&self) -> usize {
        match self {
            Event::Token { len, .. } => len.get() as usize,
            _ => 0,
        }
    }
}

/// Raw tokens consumed by a whole stream.
pub fn raw_token_count(events: &[Event]) -> usize {
    events.iter().map(Event::raw_len).sum()
}
