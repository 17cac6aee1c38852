//! YAML workbook format.
//!
//! A diff-friendly stand-in for spreadsheets, used for fixtures and review:
//!
//! ```yaml
//! Types:
//!   - [Name, Category, Field Name, Definition]
//!   - [Speed, basic, null, uint16]
//! APIs:
//!   - [API Name, Type Reference, Port Direction, SWC Name, Task]
//!   - [Vector, Vector, S, EngineSWC, 10ms]
//! ```

use indexmap::IndexMap;

use super::{Cell, Sheet, Workbook, WorkbookFormat};
use crate::error::{Error, Result};

type RawWorkbook = IndexMap<String, Vec<Vec<Cell>>>;

/// YAML workbook handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlWorkbook;

impl WorkbookFormat for YamlWorkbook {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn read(&self, input: &[u8]) -> Result<Workbook> {
        let raw: RawWorkbook =
            serde_yaml::from_slice(input).map_err(|e| Error::yaml(e.to_string()))?;
        let sheets = raw
            .into_iter()
            .map(|(name, rows)| Sheet { name, rows })
            .collect();
        Ok(Workbook { sheets })
    }

    fn write(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        let raw: RawWorkbook = workbook
            .sheets
            .iter()
            .map(|sheet| (sheet.name.clone(), sheet.rows.clone()))
            .collect();
        let text = serde_yaml::to_string(&raw).map_err(|e| Error::yaml(e.to_string()))?;
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mixed_cells() {
        let input = b"Types:\n  - [Name, Category, Field Name, Definition]\n  - [Buf, array, null, 'uint8[4]']\n  - [N, basic, ~, 12]\n";
        let wb = YamlWorkbook.read(input).unwrap();
        let sheet = wb.sheet("Types").unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1][2], Cell::Empty);
        assert_eq!(sheet.rows[1][3].normalized().as_deref(), Some("uint8[4]"));
        assert_eq!(sheet.rows[2][3].normalized().as_deref(), Some("12"));
    }

    #[test]
    fn test_write_then_read_preserves_sheet_order() {
        let wb = Workbook::new()
            .with_sheet(Sheet::new("Types").with_row(["Name"]))
            .with_sheet(Sheet::new("APIs").with_row(["API Name"]));
        let bytes = YamlWorkbook.write(&wb).unwrap();
        let back = YamlWorkbook.read(&bytes).unwrap();
        let names: Vec<_> = back.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Types", "APIs"]);
    }

    #[test]
    fn test_read_rejects_non_mapping() {
        assert!(matches!(YamlWorkbook.read(b"- just a list"), Err(Error::Yaml(_))));
    }
}
