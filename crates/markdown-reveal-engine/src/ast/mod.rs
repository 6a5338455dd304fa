//! # Typed AST
//!
//! An immutable, owned node tree built once per parse from the lossless
//! syntax tree. Blocks own their inline children outright; there are no
//! back-references, so a parse result can be dropped or cloned as a unit.
//!
//! - **`span`**: [`SourceSpan`], the byte range plus raw text every node carries
//! - **`block`** / **`inline`**: the closed variant sets
//! - **`kind`**: [`NodeKind`], a `Copy` tag for both families
//! - **`builder`**: rowan CST → typed nodes

pub mod block;
pub mod builder;
pub mod inline;
pub mod kind;
pub mod span;

pub use block::{Block, BlockNode, Task};
pub use builder::build_blocks;
pub use inline::{Inline, InlineNode, glyph};
pub use kind::NodeKind;
pub use markdown_reveal_syntax::table::Alignment;
pub use span::SourceSpan;
