//! Flat records shared by the generation and extraction directions.

use std::fmt;

/// The category column of a type row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Basic,
    Array,
    Struct,
}

impl TypeCategory {
    /// Parse a category cell (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "array" => Some(Self::Array),
            "struct" => Some(Self::Struct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Array => "array",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (fieldName, fieldType) pair of a struct, in declared order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub type_name: String,
}

impl StructField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Category-specific payload of a [`TypeDefinition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeBody {
    /// Name-only alias of another type; `None` means a terminal primitive.
    Basic { alias: Option<String> },
    /// Raw `baseType[size]` definition, parsed during resolution.
    Array { definition: Option<String> },
    /// Ordered fields.
    Struct { fields: Vec<StructField> },
}

/// A named type built from the Types sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub body: TypeBody,
}

impl TypeDefinition {
    /// An empty definition of the given category.
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        let body = match category {
            TypeCategory::Basic => TypeBody::Basic { alias: None },
            TypeCategory::Array => TypeBody::Array { definition: None },
            TypeCategory::Struct => TypeBody::Struct { fields: Vec::new() },
        };
        Self {
            name: name.into(),
            body,
        }
    }

    pub fn basic(name: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            name: name.into(),
            body: TypeBody::Basic {
                alias: alias.map(str::to_string),
            },
        }
    }

    pub fn array(name: impl Into<String>, definition: &str) -> Self {
        Self {
            name: name.into(),
            body: TypeBody::Array {
                definition: Some(definition.to_string()),
            },
        }
    }

    pub fn structure(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Self {
            name: name.into(),
            body: TypeBody::Struct { fields },
        }
    }

    pub fn category(&self) -> TypeCategory {
        match self.body {
            TypeBody::Basic { .. } => TypeCategory::Basic,
            TypeBody::Array { .. } => TypeCategory::Array,
            TypeBody::Struct { .. } => TypeCategory::Struct,
        }
    }
}

/// Data flow direction of a port, seen from the owning component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Provided port, data send point.
    #[default]
    Send,
    /// Required port, data receive point.
    Receive,
}

impl Direction {
    /// Parse a `Port Direction` cell. Accepts `S`/`R` and the spelled-out forms.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "S" | "SEND" | "SENDER" | "P" | "PROVIDED" => Some(Self::Send),
            "R" | "RECEIVE" | "RECEIVER" | "REQUIRED" => Some(Self::Receive),
            _ => None,
        }
    }

    /// Single-letter code written to the `Port Direction` column.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Send => "S",
            Self::Receive => "R",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("Send"),
            Self::Receive => f.write_str("Receive"),
        }
    }
}

/// One API/port record: an interface carried by a port of a component and
/// accessed by one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRecord {
    pub interface: String,
    pub type_ref: String,
    pub direction: Direction,
    pub component: String,
    pub task: String,
    /// Initial value, only meaningful for primitive type references.
    pub init_value: Option<String>,
}

impl ApiRecord {
    pub fn new(
        interface: impl Into<String>,
        type_ref: impl Into<String>,
        direction: Direction,
        component: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            interface: interface.into(),
            type_ref: type_ref.into(),
            direction,
            component: component.into(),
            task: task.into(),
            init_value: None,
        }
    }

    pub fn with_init_value(mut self, value: impl Into<String>) -> Self {
        self.init_value = Some(value.into());
        self
    }
}
