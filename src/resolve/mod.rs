//! Type graph resolution.
//!
//! ```text
//! TypeCatalog ──► ResolverContext::resolve_all(type refs)
//!                    │ post-order, cycle-checked
//!                    ├─► Vec<ApplicationType>     (own memo)
//!                    └─► Vec<ImplementationType>  (own memo)
//! ```

mod array;
mod resolver;

pub use array::ArrayDefinition;
pub use resolver::{
    ApplicationType, FieldRef, Hierarchy, ImplementationType, ResolvedTypes, ResolverContext,
    TypeKind, TypeRef, TypeShape,
};
