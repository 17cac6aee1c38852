//! Hierarchical document side: the element arena and its ARXML encoding.

mod arxml;
mod model;

pub use arxml::Arxml;
pub use model::{Document, Node, NodeId, SHORT_NAME};
