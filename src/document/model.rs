//! Owner-linked element arena.
//!
//! ```text
//! Document
//! ├── nodes: IndexMap<NodeId, Node>  (insertion order)
//! ├── roots: Vec<NodeId>
//! └── comment: Option<String>        (before the root element)
//! ```
//!
//! Every node records its owner, so any node can walk upward to the
//! component, package or behavior that contains it.

use indexmap::IndexMap;

/// Tag holding a node's name in reference paths.
pub const SHORT_NAME: &str = "SHORT-NAME";

/// Arena key of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Local tag name, without namespace prefix.
    pub tag: String,
    pub text: Option<String>,
    /// Attributes in document order.
    pub attributes: IndexMap<String, String>,
    pub owner: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(id: NodeId, tag: &str, owner: Option<NodeId>) -> Self {
        Self {
            id,
            tag: tag.to_string(),
            text: None,
            attributes: IndexMap::new(),
            owner,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// A hierarchical document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    nodes: IndexMap<NodeId, Node>,
    roots: Vec<NodeId>,
    /// Comment emitted before the root element.
    pub comment: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, tag: &str, owner: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.insert(id, Node::new(id, tag, owner));
        id
    }

    /// Add a top-level element.
    pub fn add_root(&mut self, tag: &str) -> NodeId {
        let id = self.allocate(tag, None);
        self.roots.push(id);
        id
    }

    /// Append a child element to `parent`.
    pub fn append_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.allocate(tag, Some(parent));
        if let Some(owner) = self.nodes.get_mut(&parent) {
            owner.children.push(id);
        }
        id
    }

    /// Append a text-only child element.
    pub fn child_with_text(&mut self, parent: NodeId, tag: &str, text: impl Into<String>) -> NodeId {
        let id = self.append_child(parent, tag);
        self.set_text(id, text);
        id
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.text = Some(text.into());
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes.insert(key.into(), value.into());
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|child| self.nodes.get(child))
    }

    /// First direct child with `tag`.
    pub fn child(&self, id: NodeId, tag: &str) -> Option<&Node> {
        self.children(id).find(|node| node.is(tag))
    }

    /// Text of the first direct child with `tag`.
    pub fn child_text(&self, id: NodeId, tag: &str) -> Option<&str> {
        self.child(id, tag)?.text.as_deref()
    }

    /// Follow a chain of direct-child tags.
    pub fn child_path(&self, id: NodeId, tags: &[&str]) -> Option<&Node> {
        let mut current = self.get(id)?;
        for tag in tags {
            current = self.child(current.id, tag)?;
        }
        Some(current)
    }

    pub fn short_name(&self, id: NodeId) -> Option<&str> {
        self.child_text(id, SHORT_NAME)
    }

    /// All descendants of `id` with `tag`, depth-first in document order.
    /// `id` itself is not included.
    pub fn descendants(&self, id: NodeId, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(id)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else {
                continue;
            };
            if node.is(tag) {
                found.push(node);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// Every element with `tag`, depth-first in document order.
    pub fn elements(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        for root in &self.roots {
            if let Some(node) = self.get(*root) {
                if node.is(tag) {
                    found.push(node);
                }
            }
            found.extend(self.descendants(*root, tag));
        }
        found
    }

    /// Nearest owner of `id` with `tag`, walking upward.
    pub fn ancestor_with_tag(&self, id: NodeId, tag: &str) -> Option<&Node> {
        let mut current = self.get(id)?.owner;
        while let Some(owner_id) = current {
            let owner = self.get(owner_id)?;
            if owner.is(tag) {
                return Some(owner);
            }
            current = owner.owner;
        }
        None
    }

    /// `/A/B/C` built from the short names of `id` and its named owners.
    pub fn reference_path(&self, id: NodeId) -> Option<String> {
        let mut segments = vec![self.short_name(id)?];
        let mut current = self.get(id)?.owner;
        while let Some(owner_id) = current {
            if let Some(name) = self.short_name(owner_id) {
                segments.push(name);
            }
            current = self.get(owner_id)?.owner;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }

    /// Inverse of [`Document::reference_path`].
    pub fn resolve_reference(&self, path: &str) -> Option<NodeId> {
        let mut scope = self.roots.clone();
        let mut found = None;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let hit = self.first_named(&scope, segment)?;
            found = Some(hit);
            scope = self.get(hit)?.children.clone();
        }
        found
    }

    /// First node named `name` under `scope`, not descending past named
    /// nodes.
    fn first_named(&self, scope: &[NodeId], name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = scope.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let node = self.get(next)?;
            match self.short_name(next) {
                Some(short) if short == name => return Some(next),
                Some(_) => {}
                None => stack.extend(node.children.iter().rev().copied()),
            }
        }
        None
    }
}
