//! Foundation types shared by every stage of a run.
//!
//! - [`paths`] - reference-path conventions of the generated document
//! - [`primitives`] - the fixed primitive-name table
//! - [`ids`] - per-node identifier sources
//! - Domain records ([`TypeDefinition`], [`ApiRecord`], [`Direction`])
//!
//! This module has NO dependencies on other arxmlgen modules.

pub mod ids;
pub mod paths;
pub mod primitives;
mod records;

pub use ids::{IdSource, SequentialIds, UuidSource};
pub use primitives::canonical_primitive;
pub use records::{ApiRecord, Direction, StructField, TypeBody, TypeCategory, TypeDefinition};

/// Component label used when an API row leaves `SWC Name` blank.
pub const DEFAULT_COMPONENT: &str = "DefaultSWC";

/// Task label used when an API row leaves `Task` blank.
pub const DEFAULT_TASK: &str = "DefaultTask";
