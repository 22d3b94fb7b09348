//! Data types for the table grid.

mod address;
mod cell;
mod column;
mod config;
mod document;
mod geometry;
mod page;
mod row;
mod style;

pub use address::*;
pub use cell::*;
pub use column::*;
pub use config::*;
pub use document::*;
pub use geometry::*;
pub use page::*;
pub use row::*;
pub use style::*;
