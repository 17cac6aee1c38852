//! Cells, sheets and workbooks.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A raw cell value as stored in the file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// The single normalization step applied before any row is interpreted:
    /// text is trimmed, numbers are stringified (integral values without a
    /// fractional part), and blank cells become `None`.
    pub fn normalized(&self) -> Option<String> {
        let text = match self {
            Self::Empty => return None,
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) => format_number(*value),
            Self::Bool(value) => value.to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn is_blank(&self) -> bool {
        self.normalized().is_none()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<Option<&str>> for Cell {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Self::Empty, Self::from)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// A named grid of cells. Row 0 is the header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row of cells.
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`Sheet::push_row`].
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.push_row(cells);
        self
    }

    /// Row 0, or an empty slice for a sheet with no rows.
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Index of the header cell equal to `name`, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header()
            .iter()
            .position(|cell| cell.normalized().as_deref() == Some(name))
    }

    /// Like [`Sheet::column`] but a missing header is fatal.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| Error::missing_column(&self.name, name))
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// Normalized value of one cell of a row; out-of-range reads as blank.
    pub fn value(row: &[Cell], column: Option<usize>) -> Option<String> {
        column.and_then(|idx| row.get(idx)).and_then(Cell::normalized)
    }

    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// An ordered set of sheets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn require_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheet(name)
            .ok_or_else(|| Error::MissingSheet(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Cell::Text("  Speed ".into()).normalized().as_deref(), Some("Speed"));
        assert_eq!(Cell::Text("   ".into()).normalized(), None);
        assert_eq!(Cell::Number(10.0).normalized().as_deref(), Some("10"));
        assert_eq!(Cell::Number(0.5).normalized().as_deref(), Some("0.5"));
        assert_eq!(Cell::Bool(true).normalized().as_deref(), Some("true"));
        assert_eq!(Cell::Empty.normalized(), None);
    }

    #[test]
    fn test_column_lookup() {
        let sheet = Sheet::new("Types")
            .with_row(["Name", "Category", " Definition "])
            .with_row(["Speed", "basic", "uint16"]);
        assert_eq!(sheet.column("Definition"), Some(2));
        assert_eq!(sheet.column("Field Name"), None);
        assert!(matches!(
            sheet.require_column("Field Name"),
            Err(Error::MissingColumn { .. })
        ));
        assert_eq!(sheet.data_rows().count(), 1);
    }

    #[test]
    fn test_value_out_of_range_is_blank() {
        let row = vec![Cell::from("a")];
        assert_eq!(Sheet::value(&row, Some(0)).as_deref(), Some("a"));
        assert_eq!(Sheet::value(&row, Some(3)), None);
        assert_eq!(Sheet::value(&row, None), None);
    }

    #[test]
    fn test_require_sheet() {
        let wb = Workbook::new().with_sheet(Sheet::new("APIs"));
        assert!(wb.require_sheet("APIs").is_ok());
        assert!(matches!(wb.require_sheet("Types"), Err(Error::MissingSheet(_))));
    }
}
