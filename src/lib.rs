//! # arxmlgen
//!
//! Translate software-component metadata between spreadsheet rows and
//! AUTOSAR ARXML.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! generate / extract → the two directions of a run
//!   ↓
//! assemble  → port/interface correlation, components and runnables
//!   ↓
//! resolve   → type graph resolution into the two type hierarchies
//!   ↓
//! catalog   → Types and APIs sheets as typed records
//!   ↓
//! tabular / document → workbook and ARXML I/O
//!   ↓
//! base      → records, reference paths, primitive names, node ids
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use arxmlgen::{Arxml, Config, UuidSource, YamlWorkbook, WorkbookFormat, generate};
//!
//! let input = std::fs::read("model.yaml")?;
//! let workbook = YamlWorkbook.read(&input)?;
//! let generation = generate(&workbook, &Config::default(), &mut UuidSource)?;
//! std::fs::write("model.arxml", Arxml.write(&generation.document)?)?;
//! # Ok::<(), arxmlgen::Error>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → tabular/document → catalog → resolve →
// assemble → generate/extract)
// ============================================================================

/// Foundation types: records, reference paths, primitive names, node ids
pub mod base;

/// Error type and recoverable diagnostics
pub mod error;

/// Run configuration
pub mod config;

/// Workbook model and file formats (XLSX, YAML)
pub mod tabular;

/// ARXML element arena and codec
pub mod document;

/// Types and APIs catalogs
pub mod catalog;

/// Type graph resolution
pub mod resolve;

/// Port/interface correlation and component assembly
pub mod assemble;

/// Workbook → ARXML
pub mod generate;

/// ARXML → workbook
pub mod extract;

pub use base::{ApiRecord, Direction, IdSource, SequentialIds, TypeDefinition, UuidSource};
pub use config::Config;
pub use document::{Arxml, Document};
pub use error::{Diagnostic, Diagnostics, Error, Result};
pub use extract::{Extraction, extract};
pub use generate::{Generation, GenerationReport, generate};
pub use tabular::{Workbook, WorkbookFormat, YamlWorkbook, detect_workbook_format};

#[cfg(feature = "xlsx")]
pub use tabular::Xlsx;
