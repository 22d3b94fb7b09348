use serde::{Deserialize, Serialize};

/// Vertical placement of text inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Per-cell style overrides. Unset fields fall back to [`TableStyle`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
}

impl CellStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Table-wide style defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    pub border_color: String,
    pub border_width: f32,
    pub text_color: String,
    /// Background for header rows (None = transparent)
    pub header_background: Option<String>,
    /// Inner padding between cell border and text
    pub cell_padding: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            border_color: "#000000".to_string(),
            border_width: 1.0,
            text_color: "#000000".to_string(),
            header_background: Some("#F3F3F3".to_string()),
            cell_padding: 4.0,
        }
    }
}

/// A cell style with every field resolved against the table defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle<'a> {
    pub background: Option<&'a str>,
    pub border_color: &'a str,
    pub border_width: f32,
    pub text_color: &'a str,
    pub vertical_align: VerticalAlign,
    pub padding: f32,
}

impl TableStyle {
    /// Resolve `cell` against these defaults. Header rows get the header
    /// background when the cell has none of its own.
    pub fn resolve<'a>(&'a self, cell: &'a CellStyle, is_header: bool) -> ResolvedStyle<'a> {
        let header_bg = if is_header {
            self.header_background.as_deref()
        } else {
            None
        };
        ResolvedStyle {
            background: cell.background.as_deref().or(header_bg),
            border_color: cell.border_color.as_deref().unwrap_or(&self.border_color),
            border_width: cell.border_width.unwrap_or(self.border_width),
            text_color: cell.text_color.as_deref().unwrap_or(&self.text_color),
            vertical_align: cell.vertical_align.unwrap_or_default(),
            padding: self.cell_padding,
        }
    }
}
