//! # Snapshot Testing Support
//!
//! Utilities for testing the parser and renderer via snapshot assertions and
//! invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a document to a stable, printable `Snap` for
//!   `insta` snapshot testing (and for `markdown-reveal dump`)
//! - **`invariants`**: Checks for partition, round trip, span consistency,
//!   inline tiling and render leaf text, reported as [`InvariantError`]

pub mod invariants;
pub mod normalize;

pub use invariants::{InvariantError, check_document, check_render};
pub use normalize::{BlockSnap, InlineSnap, Snap, normalize};
