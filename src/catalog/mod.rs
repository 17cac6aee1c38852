//! Row-stream catalogs: the first stage of generation.
//!
//! - [`TypeCatalog`] - type name -> [`TypeDefinition`](crate::base::TypeDefinition)
//! - [`ApiCatalog`] - ordered [`ApiRecord`](crate::base::ApiRecord)s with defaults applied
//!
//! Both read already-normalized cells through [`Sheet::value`](crate::tabular::Sheet::value)
//! and fail only when a required header is missing.

mod apis;
mod types;

pub use apis::{
    APIS_HEADER, API_NAME_COLUMN, ApiCatalog, INIT_VALUE_COLUMN, PORT_DIRECTION_COLUMN,
    SWC_NAME_COLUMN, TASK_COLUMN, TYPE_REFERENCE_COLUMN,
};
pub use types::{
    CATEGORY_COLUMN, DEFINITION_COLUMN, FIELD_NAME_COLUMN, NAME_COLUMN, TYPES_HEADER, TypeCatalog,
};
