//! Error types for generation and extraction runs.

use thiserror::Error;

/// Errors that abort a whole generation or extraction run.
///
/// Conditions the run can recover from (unknown type references, malformed
/// array definitions, empty structs, dropped init values) are not errors;
/// they are reported as [`Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is absent from a sheet header.
    #[error("Required column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// A required sheet is absent from the workbook.
    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    /// Type resolution ran into a cyclic reference.
    #[error("Cyclic type dependency: {}", format_cycle(.path))]
    Cycle { path: Vec<String> },

    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP container error (for XLSX workbooks).
    #[error("Archive error: {0}")]
    Archive(String),

    /// YAML parsing or serialization error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid run configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Unsupported feature or format variant.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Create a YAML error.
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml(message.into())
    }

    /// Create a missing column error.
    pub fn missing_column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            sheet: sheet.into(),
            column: column.into(),
        }
    }
}

/// Render a cycle path as `A -> B -> A`.
fn format_cycle(path: &[String]) -> String {
    let mut rendered = path.join(" -> ");
    if let Some(first) = path.first() {
        rendered.push_str(" -> ");
        rendered.push_str(first);
    }
    rendered
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A recoverable problem found during a run.
///
/// The affected item is skipped; everything else is still produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The type, API or node the problem concerns.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Ordered collection of recoverable problems, logged as they are recorded.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem and emit it as a warning.
    pub fn warn(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(subject, message);
        tracing::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// True if any recorded problem concerns `subject`.
    pub fn mentions(&self, subject: &str) -> bool {
        self.items.iter().any(|d| d.subject == subject)
    }

    /// Move all problems from `other` into `self`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_closes_loop() {
        let err = Error::Cycle {
            path: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic type dependency: A -> B -> A");
    }

    #[test]
    fn test_missing_column_message() {
        let err = Error::missing_column("Types", "Definition");
        assert_eq!(
            err.to_string(),
            "Required column 'Definition' not found in sheet 'Types'"
        );
    }

    #[test]
    fn test_diagnostics_mentions() {
        let mut diags = Diagnostics::new();
        diags.warn("Ghost", "undefined type");
        assert_eq!(diags.len(), 1);
        assert!(diags.mentions("Ghost"));
        assert!(!diags.mentions("Speed"));
    }
}
