//! # markdown-reveal-engine
//!
//! Everything above the grammar: the typed AST, the document model, the
//! cursor-aware render engine and the incremental refresh layer.
//!
//! ```text
//! text ─ parse ─▶ Document ─ render_document(active) ─▶ [RenderedBlock]
//!                    ▲                                        ▲
//!                    └──────── IncrementalEngine ─────────────┘
//!                       (diff, render cache, debounce)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_reveal_engine::{Document, RenderMode, StyleConfig, render_document};
//!
//! let doc = Document::parse("# Hello\n\nSome **bold** text\n");
//! assert_eq!(doc.to_source(), doc.source());
//!
//! // Cursor in the paragraph: it is revealed, the heading is collapsed
//! let active = doc.block_index_at_offset(12);
//! let rendered = render_document(&doc, active, &StyleConfig::default());
//! assert_eq!(rendered[0].mode, RenderMode::Collapsed);
//! assert_eq!(rendered[2].mode, RenderMode::Revealed);
//! assert_eq!(rendered[2].leaf_text(), "Some **bold** text\n");
//! ```

pub mod ast;
pub mod document;
pub mod error;
pub mod incremental;
pub mod render;
pub mod snapshot;

pub use ast::{Alignment, Block, BlockNode, Inline, InlineNode, NodeKind, SourceSpan, Task};
pub use document::{Document, NodeAt};
pub use error::EngineError;
pub use incremental::{
    ChangedBlocks, EngineOptions, IncrementalEngine, RefreshStats, RenderCache, RenderOutput,
    changed_blocks,
};
pub use markdown_reveal_syntax::Extensions;
pub use render::{
    Preset, RenderMode, RenderedBlock, Rgb, StyleConfig, StyleSlot, StyledRun, TextStyle,
    active_block_for, render_block, render_document, unstyled,
};

/// Parse `source` with every extension enabled.
pub fn parse(source: &str) -> Document {
    Document::parse(source)
}
