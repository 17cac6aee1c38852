//! The fixed table of primitive type names.
//!
//! A primitive is a terminal leaf of the type graph: it is emitted directly
//! and never looked up in the type catalog. Matching is case-insensitive;
//! each spelling maps to one canonical lower-case name, which is also the
//! implementation-side category of the emitted node.

/// (accepted lower-case spelling, canonical name)
const PRIMITIVES: &[(&str, &str)] = &[
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("uint8", "uint8"),
    ("uint16", "uint16"),
    ("uint32", "uint32"),
    ("uint64", "uint64"),
    ("sint8", "sint8"),
    ("sint16", "sint16"),
    ("sint32", "sint32"),
    ("sint64", "sint64"),
    ("float32", "float32"),
    ("float64", "float64"),
];

/// Canonical name of a primitive, or `None` if `name` is not one.
pub fn canonical_primitive(name: &str) -> Option<&'static str> {
    let lowered = name.trim().to_ascii_lowercase();
    PRIMITIVES
        .iter()
        .find(|(spelling, _)| *spelling == lowered)
        .map(|(_, canonical)| *canonical)
}
