//! # Incremental Refresh
//!
//! The grammar always reparses the whole text, so the savings live at the
//! output layer:
//!
//! - **`diff`**: prefix/suffix raw-text matching finds the changed window
//! - **`cache`**: rendered blocks keyed by raw text, mode and style identity
//! - **`debounce`**: one cancellable deadline for large documents
//! - **`engine`**: [`IncrementalEngine`] tying the three together

pub mod cache;
pub mod debounce;
pub mod diff;
pub mod engine;

pub use cache::RenderCache;
pub use debounce::Debouncer;
pub use diff::{ChangedBlocks, changed_blocks};
pub use engine::{EngineOptions, IncrementalEngine, RefreshStats, RenderOutput};
