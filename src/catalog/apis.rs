//! APICatalog: API/port records from the APIs sheet.

use crate::base::{ApiRecord, Direction};
use crate::config::Config;
use crate::error::{Diagnostics, Result};
use crate::tabular::Sheet;

pub const API_NAME_COLUMN: &str = "API Name";
pub const TYPE_REFERENCE_COLUMN: &str = "Type Reference";
pub const PORT_DIRECTION_COLUMN: &str = "Port Direction";
pub const SWC_NAME_COLUMN: &str = "SWC Name";
pub const TASK_COLUMN: &str = "Task";
pub const INIT_VALUE_COLUMN: &str = "InitValue";

/// Header of an APIs sheet, in column order.
pub const APIS_HEADER: [&str; 6] = [
    API_NAME_COLUMN,
    TYPE_REFERENCE_COLUMN,
    PORT_DIRECTION_COLUMN,
    SWC_NAME_COLUMN,
    TASK_COLUMN,
    INIT_VALUE_COLUMN,
];

/// Ordered API records, one per accepted row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiCatalog {
    records: Vec<ApiRecord>,
}

impl ApiCatalog {
    /// Build the catalog from an APIs sheet.
    ///
    /// `API Name` and `Type Reference` are required headers; the other
    /// columns are optional and default per `config`. Rows lacking either
    /// required value are skipped without a diagnostic.
    pub fn from_sheet(sheet: &Sheet, config: &Config, diagnostics: &mut Diagnostics) -> Result<Self> {
        let api_col = sheet.require_column(API_NAME_COLUMN)?;
        let type_col = sheet.require_column(TYPE_REFERENCE_COLUMN)?;
        let direction_col = sheet.column(PORT_DIRECTION_COLUMN);
        let component_col = sheet.column(SWC_NAME_COLUMN);
        let task_col = sheet.column(TASK_COLUMN);
        let init_col = sheet.column(INIT_VALUE_COLUMN);

        let mut records = Vec::new();
        for row in sheet.data_rows() {
            let (Some(interface), Some(type_ref)) =
                (Sheet::value(row, Some(api_col)), Sheet::value(row, Some(type_col)))
            else {
                continue;
            };

            let direction = match Sheet::value(row, direction_col) {
                None => Direction::default(),
                Some(text) => Direction::parse(&text).unwrap_or_else(|| {
                    diagnostics.warn(
                        &interface,
                        format!("unknown port direction '{text}', using {}", Direction::default()),
                    );
                    Direction::default()
                }),
            };
            let component = Sheet::value(row, component_col)
                .unwrap_or_else(|| config.default_component.clone());
            let task = Sheet::value(row, task_col).unwrap_or_else(|| config.default_task.clone());

            let mut record = ApiRecord::new(interface, type_ref, direction, component, task);
            record.init_value = Sheet::value(row, init_col);
            tracing::debug!(
                interface = %record.interface,
                component = %record.component,
                task = %record.task,
                "api record"
            );
            records.push(record);
        }

        tracing::info!(apis = records.len(), "api catalog built");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ApiRecord] {
        &self.records
    }

    /// Distinct type references in first-occurrence order.
    pub fn type_refs(&self) -> Vec<&str> {
        let mut seen = indexmap::IndexSet::new();
        for record in &self.records {
            seen.insert(record.type_ref.as_str());
        }
        seen.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<ApiRecord>> for ApiCatalog {
    fn from(records: Vec<ApiRecord>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tabular::Cell;

    #[test]
    fn test_defaults_fill_missing_optional_columns() {
        let sheet = Sheet::new("APIs")
            .with_row(["API Name", "Type Reference"])
            .with_row([" Speed ", "uint16 "]);
        let catalog =
            ApiCatalog::from_sheet(&sheet, &Config::default(), &mut Diagnostics::new()).unwrap();

        assert_eq!(
            catalog.records(),
            [ApiRecord::new("Speed", "uint16", Direction::Send, "DefaultSWC", "DefaultTask")]
        );
    }

    #[test]
    fn test_rows_missing_name_or_type_are_skipped() {
        let sheet = Sheet::new("APIs")
            .with_row(APIS_HEADER)
            .with_row(["", "uint8", "S", "A", "T", ""])
            .with_row(["Speed", "", "S", "A", "T", ""])
            .with_row(["", "", "", "", "", ""])
            .with_row(["Torque", "sint16", "R", "Motor", "5ms", ""]);
        let mut diags = Diagnostics::new();
        let catalog = ApiCatalog::from_sheet(&sheet, &Config::default(), &mut diags).unwrap();

        assert!(diags.is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].direction, Direction::Receive);
        assert_eq!(catalog.records()[0].task, "5ms");
    }

    #[test]
    fn test_init_value_and_blank_cells() {
        let mut sheet = Sheet::new("APIs").with_row(APIS_HEADER);
        sheet.push_row(vec![
            Cell::from("Speed"),
            Cell::from("uint16"),
            Cell::Empty,
            Cell::from("  "),
            Cell::Empty,
            Cell::Number(42.0),
        ]);
        let config = Config {
            default_task: "Idle".to_string(),
            ..Config::default()
        };
        let catalog = ApiCatalog::from_sheet(&sheet, &config, &mut Diagnostics::new()).unwrap();

        let record = &catalog.records()[0];
        assert_eq!(record.component, "DefaultSWC");
        assert_eq!(record.task, "Idle");
        assert_eq!(record.init_value.as_deref(), Some("42"));
    }

    #[test]
    fn test_unknown_direction_warns() {
        let sheet = Sheet::new("APIs")
            .with_row(["API Name", "Type Reference", "Port Direction"])
            .with_row(["Speed", "uint16", "sideways"]);
        let mut diags = Diagnostics::new();
        let catalog = ApiCatalog::from_sheet(&sheet, &Config::default(), &mut diags).unwrap();

        assert_eq!(catalog.records()[0].direction, Direction::Send);
        assert!(diags.mentions("Speed"));
    }

    #[test]
    fn test_type_refs_first_occurrence_order() {
        let catalog = ApiCatalog::from(vec![
            ApiRecord::new("A", "Pose", Direction::Send, "C", "T"),
            ApiRecord::new("B", "uint8", Direction::Send, "C", "T"),
            ApiRecord::new("C", "Pose", Direction::Send, "C", "T"),
        ]);
        assert_eq!(catalog.type_refs(), ["Pose", "uint8"]);
    }

    #[test]
    fn test_missing_api_name_column() {
        let sheet = Sheet::new("APIs").with_row(["Type Reference"]);
        let err = ApiCatalog::from_sheet(&sheet, &Config::default(), &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "API Name"));
    }
}
