//! Rendering of laid-out tables.
//!
//! This module provides:
//! - The backend-agnostic [`Painter`] trait and a recording implementation
//! - [`TableRenderer`], which culls, resolves spans and paints cells
//! - Canvas 2D painter (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod canvas;
mod painter;
mod table_renderer;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use painter::{PaintOp, Painter, RecordingPainter};
pub use table_renderer::TableRenderer;
