//! TypeGraphResolver.
//!
//! Post-order traversal of the type graph rooted at each requested name.
//! Dependencies are emitted before the type that uses them, each type at most
//! once per hierarchy. The two hierarchies share the traversal order but own
//! separate memo tables and node shapes.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use super::array::ArrayDefinition;
use crate::base::{StructField, TypeBody, TypeDefinition, canonical_primitive};
use crate::catalog::TypeCatalog;
use crate::error::{Diagnostics, Error, Result};

/// Which output tree a resolution targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hierarchy {
    /// Abstract application data types.
    Application,
    /// Concrete implementation data types.
    Implementation,
}

/// Shape of an emitted node, as seen by whoever references it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Array,
    Record,
}

/// Reference to an emitted node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeRef {
    fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// A resolved struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRef {
    pub name: String,
    pub target: TypeRef,
}

/// Application-hierarchy node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplicationType {
    Primitive {
        name: String,
    },
    Array {
        name: String,
        element: TypeRef,
        size: u64,
    },
    Record {
        name: String,
        fields: Vec<FieldRef>,
    },
}

/// Implementation-hierarchy node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImplementationType {
    /// `category` is the canonical primitive name.
    Primitive { name: String, category: String },
    Array {
        name: String,
        element: String,
        size: u64,
    },
    Structure {
        name: String,
        fields: Vec<StructField>,
    },
}

/// Node construction for one hierarchy.
pub trait TypeShape {
    const HIERARCHY: Hierarchy;

    fn primitive(name: &str, category: &str) -> Self;
    fn array(name: &str, element: &TypeRef, size: u64) -> Self;
    fn record(name: &str, fields: &[FieldRef]) -> Self;
    fn name(&self) -> &str;
}

impl TypeShape for ApplicationType {
    const HIERARCHY: Hierarchy = Hierarchy::Application;

    fn primitive(name: &str, _category: &str) -> Self {
        Self::Primitive {
            name: name.to_string(),
        }
    }

    fn array(name: &str, element: &TypeRef, size: u64) -> Self {
        Self::Array {
            name: name.to_string(),
            element: element.clone(),
            size,
        }
    }

    fn record(name: &str, fields: &[FieldRef]) -> Self {
        Self::Record {
            name: name.to_string(),
            fields: fields.to_vec(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Primitive { name } | Self::Array { name, .. } | Self::Record { name, .. } => name,
        }
    }
}

impl TypeShape for ImplementationType {
    const HIERARCHY: Hierarchy = Hierarchy::Implementation;

    fn primitive(name: &str, category: &str) -> Self {
        Self::Primitive {
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    fn array(name: &str, element: &TypeRef, size: u64) -> Self {
        Self::Array {
            name: name.to_string(),
            element: element.name.clone(),
            size,
        }
    }

    fn record(name: &str, fields: &[FieldRef]) -> Self {
        Self::Structure {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|f| StructField::new(&f.name, &f.target.name))
                .collect(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Primitive { name, .. } | Self::Array { name, .. } | Self::Structure { name, .. } => {
                name
            }
        }
    }
}

/// Emission state of one hierarchy: memo table plus nodes in emission order.
#[derive(Debug)]
struct Emission<N> {
    /// Requested name -> emitted node it resolves to. Aliases map to their
    /// target; every other key is an emitted node.
    resolved: FxHashMap<String, TypeRef>,
    /// Canonical primitive name -> its node. The first spelling names it.
    primitives: FxHashMap<&'static str, TypeRef>,
    nodes: Vec<N>,
}

impl<N> Default for Emission<N> {
    fn default() -> Self {
        Self {
            resolved: FxHashMap::default(),
            primitives: FxHashMap::default(),
            nodes: Vec::new(),
        }
    }
}

/// Recoverable problems, reported once per subject across both hierarchies.
#[derive(Debug, Default)]
struct Reporter {
    diagnostics: Diagnostics,
    reported: FxHashSet<String>,
}

impl Reporter {
    fn skip(&mut self, subject: &str, message: impl Into<String>) {
        if self.reported.insert(subject.to_string()) {
            self.diagnostics.warn(subject, message);
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct ResolvedTypes {
    pub application: Vec<ApplicationType>,
    pub implementation: Vec<ImplementationType>,
    pub diagnostics: Diagnostics,
}

/// Per-run resolution state. Construct one per generation run.
#[derive(Debug)]
pub struct ResolverContext<'a> {
    catalog: &'a TypeCatalog,
    application: Emission<ApplicationType>,
    implementation: Emission<ImplementationType>,
    reporter: Reporter,
}

impl<'a> ResolverContext<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            application: Emission::default(),
            implementation: Emission::default(),
            reporter: Reporter::default(),
        }
    }

    /// Resolve `name` and all its dependencies into `hierarchy`.
    ///
    /// Returns the node the name resolves to, or `None` if it was skipped
    /// (reported as a diagnostic). A cyclic reference is fatal.
    pub fn resolve(&mut self, name: &str, hierarchy: Hierarchy) -> Result<Option<TypeRef>> {
        let mut path = IndexSet::new();
        match hierarchy {
            Hierarchy::Application => visit(
                self.catalog,
                &mut self.application,
                &mut self.reporter,
                &mut path,
                name,
            ),
            Hierarchy::Implementation => visit(
                self.catalog,
                &mut self.implementation,
                &mut self.reporter,
                &mut path,
                name,
            ),
        }
    }

    /// Resolve every name into both hierarchies, in the given order.
    pub fn resolve_all<'n>(&mut self, names: impl IntoIterator<Item = &'n str>) -> Result<()> {
        let names: Vec<&str> = names.into_iter().collect();
        for hierarchy in [Hierarchy::Application, Hierarchy::Implementation] {
            for name in &names {
                self.resolve(name, hierarchy)?;
            }
        }
        tracing::info!(
            application = self.application.nodes.len(),
            implementation = self.implementation.nodes.len(),
            "types resolved"
        );
        Ok(())
    }

    /// What `name` resolved to in `hierarchy`, if it has been resolved.
    pub fn lookup(&self, name: &str, hierarchy: Hierarchy) -> Option<&TypeRef> {
        match hierarchy {
            Hierarchy::Application => self.application.resolved.get(name),
            Hierarchy::Implementation => self.implementation.resolved.get(name),
        }
    }

    pub fn application_types(&self) -> &[ApplicationType] {
        &self.application.nodes
    }

    pub fn implementation_types(&self) -> &[ImplementationType] {
        &self.implementation.nodes
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.reporter.diagnostics
    }

    pub fn finish(self) -> ResolvedTypes {
        ResolvedTypes {
            application: self.application.nodes,
            implementation: self.implementation.nodes,
            diagnostics: self.reporter.diagnostics,
        }
    }
}

fn visit<N: TypeShape>(
    catalog: &TypeCatalog,
    emission: &mut Emission<N>,
    reporter: &mut Reporter,
    path: &mut IndexSet<String>,
    name: &str,
) -> Result<Option<TypeRef>> {
    if let Some(start) = path.get_index_of(name) {
        let cycle: Vec<String> = path.iter().skip(start).cloned().collect();
        return Err(Error::Cycle { path: cycle });
    }
    if let Some(done) = emission.resolved.get(name) {
        return Ok(Some(done.clone()));
    }

    let Some(def) = catalog.get(name) else {
        if let Some(category) = canonical_primitive(name) {
            return Ok(Some(emit_primitive(emission, name, category)));
        }
        reporter.skip(name, "undefined type, skipped");
        return Ok(None);
    };

    path.insert(name.to_string());
    let result = visit_definition(catalog, emission, reporter, path, def);
    path.pop();
    result
}

fn visit_definition<N: TypeShape>(
    catalog: &TypeCatalog,
    emission: &mut Emission<N>,
    reporter: &mut Reporter,
    path: &mut IndexSet<String>,
    def: &TypeDefinition,
) -> Result<Option<TypeRef>> {
    let name = def.name.as_str();
    match &def.body {
        TypeBody::Basic { alias: None } => match canonical_primitive(name) {
            Some(category) => Ok(Some(emit_primitive(emission, name, category))),
            None => Ok(Some(emit(emission, name, TypeKind::Primitive, N::primitive(name, name)))),
        },
        TypeBody::Basic { alias: Some(alias) } => {
            let target = visit(catalog, emission, reporter, path, alias)?;
            if let Some(target) = &target {
                emission.resolved.insert(name.to_string(), target.clone());
            }
            Ok(target)
        }
        TypeBody::Array { definition: None } => {
            reporter.skip(name, "array type has no definition, skipped");
            Ok(None)
        }
        TypeBody::Array {
            definition: Some(text),
        } => {
            let Some(array) = ArrayDefinition::parse(text) else {
                reporter.skip(name, format!("malformed array definition '{text}', skipped"));
                return Ok(None);
            };
            let Some(element) = visit(catalog, emission, reporter, path, &array.base)? else {
                reporter.skip(
                    name,
                    format!("element type '{}' unresolved, array skipped", array.base),
                );
                return Ok(None);
            };
            let node = N::array(name, &element, array.size);
            Ok(Some(emit(emission, name, TypeKind::Array, node)))
        }
        TypeBody::Struct { fields } if fields.is_empty() => {
            reporter.skip(name, "struct type has no fields, skipped");
            Ok(None)
        }
        TypeBody::Struct { fields } => {
            let mut resolved = Vec::with_capacity(fields.len());
            let mut missing = Vec::new();
            for field in fields {
                match visit(catalog, emission, reporter, path, &field.type_name)? {
                    Some(target) => resolved.push(FieldRef {
                        name: field.name.clone(),
                        target,
                    }),
                    None => missing.push(field.name.as_str()),
                }
            }
            if !missing.is_empty() {
                reporter.skip(
                    name,
                    format!("field(s) {} unresolved, struct skipped", missing.join(", ")),
                );
                return Ok(None);
            }
            let node = N::record(name, &resolved);
            Ok(Some(emit(emission, name, TypeKind::Record, node)))
        }
    }
}

/// Emit a table primitive once per canonical name; other spellings map to it.
fn emit_primitive<N: TypeShape>(
    emission: &mut Emission<N>,
    name: &str,
    category: &'static str,
) -> TypeRef {
    if let Some(existing) = emission.primitives.get(category).cloned() {
        emission.resolved.insert(name.to_string(), existing.clone());
        return existing;
    }
    let reference = emit(emission, name, TypeKind::Primitive, N::primitive(name, category));
    emission.primitives.insert(category, reference.clone());
    reference
}

fn emit<N: TypeShape>(emission: &mut Emission<N>, name: &str, kind: TypeKind, node: N) -> TypeRef {
    tracing::debug!(hierarchy = ?N::HIERARCHY, type_name = %name, ?kind, "emit type");
    let reference = TypeRef::new(name, kind);
    emission.resolved.insert(name.to_string(), reference.clone());
    emission.nodes.push(node);
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TypeDefinition;

    fn catalog(defs: Vec<TypeDefinition>) -> TypeCatalog {
        defs.into_iter().collect()
    }

    fn application_names(ctx: &ResolverContext<'_>) -> Vec<String> {
        ctx.application_types()
            .iter()
            .map(|n| n.name().to_string())
            .collect()
    }

    #[test]
    fn test_struct_dependencies_emitted_first() {
        let catalog = catalog(vec![
            TypeDefinition::basic("Basic8", None),
            TypeDefinition::array("Array4", "Basic8[4]"),
            TypeDefinition::structure(
                "S",
                vec![StructField::new("a", "Basic8"), StructField::new("b", "Array4")],
            ),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve_all(["S"]).unwrap();

        assert_eq!(application_names(&ctx), ["Basic8", "Array4", "S"]);
        assert_eq!(
            ctx.application_types()[1],
            ApplicationType::Array {
                name: "Array4".to_string(),
                element: TypeRef::new("Basic8", TypeKind::Primitive),
                size: 4,
            }
        );
        let ApplicationType::Record { fields, .. } = &ctx.application_types()[2] else {
            panic!("S should be a record");
        };
        assert_eq!(fields[1].target, TypeRef::new("Array4", TypeKind::Array));

        let idt: Vec<_> = ctx.implementation_types().iter().map(|n| n.name()).collect();
        assert_eq!(idt, ["Basic8", "Array4", "S"]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let catalog = catalog(vec![
            TypeDefinition::basic("Speed", Some("uint16")),
            TypeDefinition::array("Vector", "Speed[3]"),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve("Vector", Hierarchy::Application).unwrap();
        ctx.resolve("Vector", Hierarchy::Application).unwrap();
        ctx.resolve("Speed", Hierarchy::Application).unwrap();

        assert_eq!(application_names(&ctx), ["uint16", "Vector"]);
        assert!(ctx.implementation_types().is_empty());
    }

    #[test]
    fn test_alias_resolves_to_terminal_type() {
        let catalog = catalog(vec![
            TypeDefinition::basic("Speed", Some("uint16")),
            TypeDefinition::array("Vector", "Speed[3]"),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve_all(["Vector"]).unwrap();

        assert_eq!(
            ctx.implementation_types(),
            [
                ImplementationType::Primitive {
                    name: "uint16".to_string(),
                    category: "uint16".to_string()
                },
                ImplementationType::Array {
                    name: "Vector".to_string(),
                    element: "uint16".to_string(),
                    size: 3
                },
            ]
        );
        assert_eq!(
            ctx.lookup("Speed", Hierarchy::Application),
            Some(&TypeRef::new("uint16", TypeKind::Primitive))
        );
    }

    #[test]
    fn test_primitive_spellings_share_one_node() {
        let catalog = catalog(vec![TypeDefinition::structure(
            "Pair",
            vec![StructField::new("a", "uint8"), StructField::new("b", "UINT8")],
        )]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve_all(["Pair", "Uint8"]).unwrap();

        assert_eq!(application_names(&ctx), ["uint8", "Pair"]);
        let idt: Vec<_> = ctx.implementation_types().iter().map(|n| n.name()).collect();
        assert_eq!(idt, ["uint8", "Pair"]);
        for spelling in ["UINT8", "Uint8"] {
            assert_eq!(
                ctx.lookup(spelling, Hierarchy::Implementation),
                Some(&TypeRef::new("uint8", TypeKind::Primitive))
            );
        }
    }

    #[test]
    fn test_cycle_is_fatal_and_emits_nothing() {
        let catalog = catalog(vec![
            TypeDefinition::structure("A", vec![StructField::new("b", "B")]),
            TypeDefinition::structure("B", vec![StructField::new("a", "A")]),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        let err = ctx.resolve_all(["A"]).unwrap_err();

        let Error::Cycle { path } = &err else {
            panic!("expected a cycle error, got {err}");
        };
        assert!(path.contains(&"A".to_string()));
        assert!(path.contains(&"B".to_string()));
        assert!(ctx.application_types().is_empty());
    }

    #[test]
    fn test_alias_cycle_detected() {
        let catalog = catalog(vec![
            TypeDefinition::basic("X", Some("Y")),
            TypeDefinition::basic("Y", Some("X")),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        let err = ctx.resolve("X", Hierarchy::Implementation).unwrap_err();
        assert_eq!(err.to_string(), "Cyclic type dependency: X -> Y -> X");
    }

    #[test]
    fn test_unknown_type_skipped_with_diagnostic() {
        let catalog = catalog(vec![TypeDefinition::structure(
            "Pose",
            vec![StructField::new("x", "sint16"), StructField::new("y", "Ghost")],
        )]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve_all(["Pose", "Ghost"]).unwrap();

        // The resolvable branch survives.
        assert_eq!(application_names(&ctx), ["sint16"]);
        let resolved = ctx.finish();
        assert!(resolved.diagnostics.mentions("Ghost"));
        assert!(resolved.diagnostics.mentions("Pose"));
        // Reported once even though both hierarchies hit it.
        assert_eq!(
            resolved.diagnostics.iter().filter(|d| d.subject == "Ghost").count(),
            1
        );
    }

    #[test]
    fn test_malformed_and_empty_definitions_skipped() {
        let catalog = catalog(vec![
            TypeDefinition::array("Bad", "uint8[x]"),
            TypeDefinition::new("Hollow", crate::base::TypeCategory::Array),
            TypeDefinition::structure("Empty", vec![]),
            TypeDefinition::basic("Flag", Some("bool")),
        ]);
        let mut ctx = ResolverContext::new(&catalog);
        ctx.resolve_all(["Bad", "Hollow", "Empty", "Flag"]).unwrap();

        assert_eq!(application_names(&ctx), ["bool"]);
        assert_eq!(
            ctx.implementation_types()[0],
            ImplementationType::Primitive {
                name: "bool".to_string(),
                category: "boolean".to_string()
            }
        );
        let diags = ctx.diagnostics();
        assert!(diags.mentions("Bad") && diags.mentions("Hollow") && diags.mentions("Empty"));
    }
}
