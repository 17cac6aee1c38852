//! Common trait for workbook file formats.

use super::Workbook;
use crate::error::Result;

/// Trait for spreadsheet file formats.
///
/// Implementations convert between raw file bytes and the in-memory
/// [`Workbook`]; header lookup and row interpretation happen in the
/// catalogs, never here.
pub trait WorkbookFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    /// Read a workbook from bytes.
    fn read(&self, input: &[u8]) -> Result<Workbook>;

    /// Write a workbook to bytes.
    fn write(&self, workbook: &Workbook) -> Result<Vec<u8>>;
}
