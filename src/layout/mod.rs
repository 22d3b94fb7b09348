//! Layout engine for computing cell positions and viewport management.
//!
//! This module handles:
//! - The covered-cell index derived from merged spans
//! - Two-pass row height / position computation with a dirty-flag cache
//! - Binary search over cached rows for render culling
//! - Viewport state (scroll position, visible range)

mod covered;
mod engine;
pub mod visible;
mod viewport;

pub use covered::CoveredCellIndex;
pub use engine::LayoutEngine;
pub use viewport::Viewport;
