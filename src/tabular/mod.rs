//! Spreadsheet-side representation: workbooks of named sheets of cells.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │  .xlsx file  │     │  .yaml file  │
//! └──────┬───────┘     └──────┬───────┘
//!        ▼                    ▼
//! ┌──────────────────────────────────────┐
//! │        WorkbookFormat trait          │
//! │  - read(&[u8]) -> Result<Workbook>   │
//! │  - write(&Workbook) -> Result<bytes> │
//! └──────────────────────────────────────┘
//!        │
//!        ▼
//! ┌──────────────────────────────────────┐
//! │  Workbook { sheets: Vec<Sheet> }     │
//! │  Sheet { name, rows: Vec<Vec<Cell>> }│
//! └──────────────────────────────────────┘
//! ```

mod cell;
mod format;
#[cfg(feature = "xlsx")]
mod xlsx;
mod yaml;

pub use cell::{Cell, Sheet, Workbook};
pub use format::WorkbookFormat;
#[cfg(feature = "xlsx")]
pub use xlsx::Xlsx;
pub use yaml::YamlWorkbook;

/// Detect a workbook format from a file extension.
pub fn detect_workbook_format(path: &std::path::Path) -> Option<Box<dyn WorkbookFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        #[cfg(feature = "xlsx")]
        "xlsx" => Some(Box::new(Xlsx)),
        "yaml" | "yml" => Some(Box::new(YamlWorkbook)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_detect_workbook_format() {
        let yaml = detect_workbook_format(Path::new("sheets.YML")).unwrap();
        assert_eq!(yaml.name(), "YAML");
        assert!(detect_workbook_format(Path::new("model.arxml")).is_none());
        assert!(detect_workbook_format(Path::new("no_extension")).is_none());
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_detect_xlsx() {
        let xlsx = detect_workbook_format(Path::new("in/apis.xlsx")).unwrap();
        assert_eq!(xlsx.name(), "XLSX");
    }
}
