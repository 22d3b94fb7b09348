//! Structured error types for tablegrid.
//!
//! Only genuinely exceptional failures (malformed documents, I/O) surface as
//! [`TableError`]. Refused merges and splits are expected outcomes and are
//! reported through [`MergeError`] inside an [`OperationResult`].

use serde::{Deserialize, Serialize};

/// All errors that can occur when loading, saving or addressing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid cell reference text such as `"1A"`.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// A persisted document violates a grid invariant.
    #[error("Invalid table document: {0}")]
    InvalidDocument(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

impl From<String> for TableError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TableError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TableError> for wasm_bindgen::JsValue {
    fn from(e: TableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

/// Why a merge or split was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum MergeError {
    /// The range (or address) lies partly outside the grid.
    #[error("range is out of bounds")]
    OutOfBounds,
    /// The normalized range covers a single cell.
    #[error("range must contain more than one cell")]
    SingleCell,
    /// The range cuts through a span that is not fully contained in it.
    #[error("range overlaps an existing merged span")]
    OverlapsExistingSpan,
    /// Split requested on a cell that is not a merge origin.
    #[error("cell is not merged")]
    NotMerged,
}

/// Discriminated result of a merge/split request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MergeError>,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn err(error: MergeError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

impl<T> From<std::result::Result<T, MergeError>> for OperationResult {
    fn from(result: std::result::Result<T, MergeError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::err(e),
        }
    }
}
