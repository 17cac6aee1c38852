//! Run configuration.
//!
//! Every field has a default, so an empty YAML document (or no config file
//! at all) reproduces the stock behavior:
//!
//! ```yaml
//! types_sheet: Types
//! apis_sheet: APIs
//! default_component: DefaultSWC
//! default_task: DefaultTask
//! schema_namespace: http://autosar.org/schema/r4.0
//! schema_location: AUTOSAR_4-3-0.xsd
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::base::{DEFAULT_COMPONENT, DEFAULT_TASK};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sheet holding type rows.
    pub types_sheet: String,
    /// Sheet holding API rows.
    pub apis_sheet: String,
    /// Component label for API rows with a blank `SWC Name`.
    pub default_component: String,
    /// Task label for API rows with a blank `Task`.
    pub default_task: String,
    /// Default XML namespace of the generated root element.
    pub schema_namespace: String,
    /// Schema file named in `xsi:schemaLocation`.
    pub schema_location: String,
    /// Comment written before the root element; empty disables it.
    pub tool_banner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            types_sheet: "Types".to_string(),
            apis_sheet: "APIs".to_string(),
            default_component: DEFAULT_COMPONENT.to_string(),
            default_task: DEFAULT_TASK.to_string(),
            schema_namespace: "http://autosar.org/schema/r4.0".to_string(),
            schema_location: "AUTOSAR_4-3-0.xsd".to_string(),
            tool_banner: format!("generated by arxmlgen {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// `xsi:schemaLocation` value: namespace and schema file.
    pub fn schema_location_attr(&self) -> String {
        format!("{} {}", self.schema_namespace, self.schema_location)
    }

    fn validate(&self) -> Result<()> {
        let labels = [
            ("types_sheet", &self.types_sheet),
            ("apis_sheet", &self.apis_sheet),
            ("default_component", &self.default_component),
            ("default_task", &self.default_task),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("'{key}' must not be empty")));
            }
        }
        Ok(())
    }
}
