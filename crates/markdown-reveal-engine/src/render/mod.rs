//! # Render Engine
//!
//! Turns a [`Document`](crate::Document) plus the active block index into one
//! styled-run tree per block. The active block renders
//! [`Revealed`](RenderMode::Revealed) and every other block
//! [`Collapsed`](RenderMode::Collapsed); in both modes the leaves of a block's
//! tree spell out its raw text exactly, so a host can hit-test and place the
//! caret against the underlying source.

pub mod renderer;
pub mod run;
pub mod style;

pub use renderer::{active_block_for, mode_for, render_block, render_document, unstyled};
pub use run::{RenderMode, RenderedBlock, StyledRun};
pub use style::{Preset, Rgb, StyleConfig, StyleSlot, TextStyle};
