//! TypeCatalog: type definitions from the Types sheet.
//!
//! A row with a populated `Name` opens a new definition and moves the
//! cursor to it; rows with a blank `Name` continue the definition under the
//! cursor.
//!
//! ```text
//! Name    | Category | Field Name | Definition
//! Speed   | basic    |            | uint16
//! Pose    | struct   | x          | Speed      <- opens Pose, first field
//!         |          | y          | Speed      <- continues Pose
//! ```

use indexmap::IndexMap;

use crate::base::{StructField, TypeBody, TypeCategory, TypeDefinition};
use crate::error::{Diagnostics, Result};
use crate::tabular::Sheet;

pub const NAME_COLUMN: &str = "Name";
pub const CATEGORY_COLUMN: &str = "Category";
pub const FIELD_NAME_COLUMN: &str = "Field Name";
pub const DEFINITION_COLUMN: &str = "Definition";

/// Header of a Types sheet, in column order.
pub const TYPES_HEADER: [&str; 4] = [
    NAME_COLUMN,
    CATEGORY_COLUMN,
    FIELD_NAME_COLUMN,
    DEFINITION_COLUMN,
];

/// Column indices resolved from the header.
#[derive(Clone, Copy, Debug)]
struct Columns {
    name: usize,
    category: usize,
    /// Absent in legacy sheets; struct fields are then `name: type` strings.
    field_name: Option<usize>,
    definition: usize,
}

impl Columns {
    fn resolve(sheet: &Sheet) -> Result<Self> {
        Ok(Self {
            name: sheet.require_column(NAME_COLUMN)?,
            category: sheet.require_column(CATEGORY_COLUMN)?,
            field_name: sheet.column(FIELD_NAME_COLUMN),
            definition: sheet.require_column(DEFINITION_COLUMN)?,
        })
    }
}

/// Mapping type name -> definition, in first-definition order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from a Types sheet.
    ///
    /// A missing `Name`, `Category` or `Definition` header aborts before any
    /// row is read. Rejected rows (unknown category, self-aliasing basic
    /// types) are recorded in `diagnostics` and dropped.
    pub fn from_sheet(sheet: &Sheet, diagnostics: &mut Diagnostics) -> Result<Self> {
        let columns = Columns::resolve(sheet)?;
        if columns.field_name.is_none() {
            tracing::debug!(sheet = %sheet.name, "no field-name column, reading legacy struct rows");
        }

        let mut catalog = Self::new();
        let mut cursor: Option<String> = None;

        for row in sheet.data_rows() {
            let name = Sheet::value(row, Some(columns.name));
            let category = Sheet::value(row, Some(columns.category));
            let field_name = Sheet::value(row, columns.field_name);
            let definition = Sheet::value(row, Some(columns.definition));

            match name {
                Some(name) => {
                    cursor = catalog.open(name, category, field_name, definition, columns, diagnostics);
                }
                None => {
                    let Some(current) = cursor.clone() else {
                        continue;
                    };
                    let Some(def) = catalog.types.get_mut(&current) else {
                        continue;
                    };
                    if continue_definition(def, field_name, definition, columns)
                        == Continuation::SelfAlias
                    {
                        catalog.types.shift_remove(&current);
                        diagnostics.warn(&current, "basic type aliases itself, type dropped");
                        cursor = None;
                    }
                }
            }
        }

        tracing::info!(types = catalog.len(), "type catalog built");
        Ok(catalog)
    }

    /// Start a definition from a named row. Returns the new cursor.
    fn open(
        &mut self,
        name: String,
        category: Option<String>,
        field_name: Option<String>,
        definition: Option<String>,
        columns: Columns,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        let Some(kind) = category.as_deref().and_then(TypeCategory::parse) else {
            diagnostics.warn(
                &name,
                format!(
                    "unknown type category '{}', type dropped",
                    category.as_deref().unwrap_or_default()
                ),
            );
            return None;
        };

        let def = match kind {
            TypeCategory::Basic => {
                if is_self_alias(&name, definition.as_deref()) {
                    diagnostics.warn(&name, "basic type aliases itself, type dropped");
                    return None;
                }
                TypeDefinition::basic(&name, definition.as_deref())
            }
            TypeCategory::Array => TypeDefinition {
                name: name.clone(),
                body: TypeBody::Array { definition },
            },
            TypeCategory::Struct => {
                let mut def = TypeDefinition::new(&name, TypeCategory::Struct);
                // A struct row never aliases, so the outcome is always `Applied`.
                continue_definition(&mut def, field_name, definition, columns);
                def
            }
        };

        if self.types.insert(name.clone(), def).is_some() {
            diagnostics.warn(&name, "type defined more than once, last definition kept");
        }
        tracing::debug!(type_name = %name, category = %kind, "type opened");
        Some(name)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn category_of(&self, name: &str) -> Option<TypeCategory> {
        self.get(name).map(TypeDefinition::category)
    }

    pub fn insert(&mut self, def: TypeDefinition) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDefinition> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}

/// What a continuation row did to the definition under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    Applied,
    /// The row gave a basic type its own name as alias; the type must go.
    SelfAlias,
}

fn is_self_alias(name: &str, alias: Option<&str>) -> bool {
    alias.is_some_and(|alias| alias.eq_ignore_ascii_case(name))
}

/// Apply one continuation row (or the field part of an opening struct row).
fn continue_definition(
    def: &mut TypeDefinition,
    field_name: Option<String>,
    definition: Option<String>,
    columns: Columns,
) -> Continuation {
    match &mut def.body {
        TypeBody::Basic { alias } => {
            if alias.is_none() {
                if is_self_alias(&def.name, definition.as_deref()) {
                    return Continuation::SelfAlias;
                }
                *alias = definition;
            }
        }
        // Only the definition column matters; the first one wins.
        TypeBody::Array { definition: slot } => {
            if slot.is_none() {
                *slot = definition;
            }
        }
        TypeBody::Struct { fields } => {
            let Some(definition) = definition else {
                return Continuation::Applied;
            };
            let position = fields.len() + 1;
            let field = match columns.field_name {
                Some(_) => StructField::new(
                    field_name.unwrap_or_else(|| positional_field(position)),
                    definition,
                ),
                None => legacy_field(&definition, position),
            };
            fields.push(field);
        }
    }
    Continuation::Applied
}

/// Parse a legacy `name: type` field string.
fn legacy_field(text: &str, position: usize) -> StructField {
    match text.split_once(':') {
        Some((name, type_name)) if !name.trim().is_empty() => {
            StructField::new(name.trim(), type_name.trim())
        }
        _ => StructField::new(positional_field(position), text.trim()),
    }
}

fn positional_field(position: usize) -> String {
    format!("Field{position}")
}
