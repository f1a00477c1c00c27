//! Tree capability layer.
//!
//! The extractor never touches a concrete DOM directly. It walks any host tree
//! through the [`TreeNode`] trait, addresses nodes with root-anchored
//! [`NodePath`]s, and builds its output as a detached [`Fragment`].
//!
//! ## Paths
//!
//! A path runs from a node up to a designated root, both inclusive:
//!
//! ```text
//! path[0]    = target node
//! path[last] = root
//! ```
//!
//! Every consecutive pair is a direct child/parent link in the host tree.

use crate::error::{Error, Result};

/// Capabilities the extractor needs from a host tree node.
///
/// Implementations are cheap handles (`Clone`) with identity equality
/// (`PartialEq` means "same node", not "equal content").
pub trait TreeNode: Clone + PartialEq {
    /// Parent node, if any.
    fn parent(&self) -> Option<Self>;

    /// Element and text children in document order.
    fn children(&self) -> Vec<Self>;

    /// Whether this is a text node.
    fn is_text(&self) -> bool;

    /// Text of a text node. Empty for elements.
    fn text_value(&self) -> String;

    /// Lowercase tag name for elements, `None` for anything else.
    fn tag_name(&self) -> Option<String>;

    /// Attributes in source order. Empty for non-elements.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Whether this element matches a CSS selector (comma lists included).
    /// Non-elements never match.
    fn matches(&self, selector: &str) -> bool;

    /// Whether this is an element node.
    fn is_element(&self) -> bool {
        self.tag_name().is_some()
    }

    /// Value of one attribute.
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// All descendants (not including `self`) in document order.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// Descendant elements matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|node| node.matches(selector))
            .collect()
    }

    /// Detached copy of this node alone: tag and attributes, no children.
    fn clone_shallow(&self) -> Fragment {
        if self.is_text() {
            return Fragment::Text(self.text_value());
        }
        Fragment::element(
            self.tag_name().unwrap_or_else(|| "div".to_string()),
            self.attributes(),
        )
    }

    /// Detached copy of this node and everything below it.
    ///
    /// Walks with an explicit stack, so nesting depth is bounded by memory
    /// rather than the call stack.
    fn clone_deep(&self) -> Fragment {
        let mut open = vec![(self.clone_shallow(), self.children().into_iter())];
        while let Some((_, pending)) = open.last_mut() {
            if let Some(child) = pending.next() {
                let grandchildren = child.children().into_iter();
                open.push((child.clone_shallow(), grandchildren));
                continue;
            }
            let Some((done, _)) = open.pop() else {
                break;
            };
            match open.last_mut() {
                Some((parent, _)) => parent.push(done),
                None => return done,
            }
        }
        self.clone_shallow()
    }
}

/// A detached, owned clone tree.
///
/// Synthetic subtrees produced by the extractor live here until they are
/// materialized into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// An element with its attributes and children.
    Element {
        /// Lowercase tag name.
        name: String,
        /// Attributes in source order.
        attrs: Vec<(String, String)>,
        /// Children in document order.
        children: Vec<Fragment>,
    },
    /// A text node.
    Text(String),
}

impl Fragment {
    /// Create a childless element.
    #[must_use]
    pub fn element(name: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        Self::Element {
            name: name.into(),
            attrs,
            children: Vec::new(),
        }
    }

    /// Tag name, `None` for text.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            Self::Text(_) => None,
        }
    }

    /// Children, empty for text.
    #[must_use]
    pub fn children(&self) -> &[Fragment] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text(_) => &[],
        }
    }

    /// Append a child. Text nodes cannot have children; the call is a no-op.
    pub fn push(&mut self, child: Fragment) {
        if let Self::Element { children, .. } = self {
            children.push(child);
        }
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Self::Text(_) => None,
        }
    }

    /// Set (or replace) an attribute on an element.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        if let Self::Element { attrs, .. } = self {
            match attrs.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((key.to_string(), value.to_string())),
            }
        }
    }

    /// Raw concatenated text of all descendant text nodes (markup text, not rendered text).
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Text(text) => out.push_str(text),
                Self::Element { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Number of nodes in this fragment, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

// Children are moved onto a flat list before they drop, so a deep fragment
// never drops recursively.
impl Drop for Fragment {
    fn drop(&mut self) {
        let Self::Element { children, .. } = self else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let Self::Element { children, .. } = &mut node {
                stack.append(children);
            }
        }
    }
}

/// Root-anchored chain of nodes: `nodes[0]` is the target, the last node is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath<N> {
    nodes: Vec<N>,
}

impl<N: TreeNode> NodePath<N> {
    /// Walk parent links from `node` up to `root`.
    ///
    /// Returns `None` when `root` is not an ancestor of (or equal to) `node`.
    #[must_use]
    pub fn to_root(node: &N, root: &N) -> Option<Self> {
        let mut nodes = vec![node.clone()];
        let mut current = node.clone();
        while current != *root {
            current = current.parent()?;
            nodes.push(current.clone());
        }
        Some(Self { nodes })
    }

    /// Build a path from an explicit node list, target first.
    ///
    /// Every consecutive pair must be a direct child/parent link. An empty
    /// list is accepted and means "no boundary on this side".
    pub fn from_nodes(nodes: Vec<N>) -> Result<Self> {
        for (index, pair) in nodes.windows(2).enumerate() {
            if pair[0].parent().as_ref() != Some(&pair[1]) {
                return Err(Error::InvalidBoundary(format!(
                    "path entry {} is not the parent of entry {index}",
                    index + 1
                )));
            }
        }
        Ok(Self { nodes })
    }

    /// The node this path points at.
    #[must_use]
    pub fn target(&self) -> Option<&N> {
        self.nodes.first()
    }

    /// The root the path is anchored to.
    #[must_use]
    pub fn root(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Whether the path's last entry is `root`.
    #[must_use]
    pub fn ends_at(&self, root: &N) -> bool {
        self.root() == Some(root)
    }

    /// Nodes, target first.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of nodes on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes, root first.
    pub(crate) fn root_first(&self) -> Vec<N> {
        self.nodes.iter().rev().cloned().collect()
    }
}
