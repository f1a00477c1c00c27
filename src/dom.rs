//! DOM Operations Adapter
//!
//! Binds the `dom_query` crate to the extractor's [`TreeNode`] capability
//! trait. [`DomNode`] is a copyable handle onto one node of a parsed
//! document; everything else here is a thin helper over `dom_query`.

use std::fmt;

// Re-export core types for external use
pub use dom_query::{Document, Matcher, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use tracing::debug;

use crate::tree::TreeNode;

/// Handle onto a node of a `dom_query` document.
///
/// Equality is node identity: same node id in the same tree.
#[derive(Clone, Copy)]
pub struct DomNode<'a>(NodeRef<'a>);

impl<'a> DomNode<'a> {
    /// Wrap a `dom_query` node.
    #[inline]
    #[must_use]
    pub fn new(node: NodeRef<'a>) -> Self {
        Self(node)
    }

    /// The wrapped `dom_query` node.
    #[inline]
    #[must_use]
    pub fn node_ref(&self) -> NodeRef<'a> {
        self.0
    }

    /// Single-node selection for `dom_query` operations.
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Selection<'a> {
        Selection::from(self.0)
    }

    /// Outer HTML of this node.
    #[must_use]
    pub fn outer_html(&self) -> StrTendril {
        self.selection().html()
    }
}

impl PartialEq for DomNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id && std::ptr::eq(self.0.tree, other.0.tree)
    }
}

impl Eq for DomNode<'_> {}

impl fmt::Debug for DomNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag_name() {
            Some(tag) => match self.attribute("id") {
                Some(id) => write!(f, "DomNode(<{tag}#{id}>)"),
                None => write!(f, "DomNode(<{tag}>)"),
            },
            None if self.is_text() => write!(f, "DomNode({:?})", self.text_value()),
            None => write!(f, "DomNode(#document)"),
        }
    }
}

impl TreeNode for DomNode<'_> {
    fn parent(&self) -> Option<Self> {
        self.0.parent().map(DomNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .into_iter()
            .filter(|child| child.is_element() || child.is_text())
            .map(DomNode)
            .collect()
    }

    fn is_text(&self) -> bool {
        self.0.is_text()
    }

    fn text_value(&self) -> String {
        if self.0.is_text() {
            self.0.text().to_string()
        } else {
            String::new()
        }
    }

    fn tag_name(&self) -> Option<String> {
        if !self.0.is_element() {
            return None;
        }
        self.0.node_name().map(|name| name.to_ascii_lowercase())
    }

    fn attributes(&self) -> Vec<(String, String)> {
        if !self.0.is_element() {
            return Vec::new();
        }
        self.0
            .attrs()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect()
    }

    fn matches(&self, selector: &str) -> bool {
        if !self.0.is_element() {
            return false;
        }
        matcher(selector).is_some_and(|m| self.selection().is_matcher(&m))
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        let Some(m) = matcher(selector) else {
            return Vec::new();
        };
        self.selection()
            .select_matcher(&m)
            .nodes()
            .iter()
            .copied()
            .map(DomNode)
            .collect()
    }
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Querying ===

/// Compiled selector, or `None` when it does not parse.
#[must_use]
pub fn matcher(selector: &str) -> Option<Matcher> {
    match Matcher::new(selector) {
        Ok(m) => Some(m),
        Err(_) => {
            debug!(selector, "ignoring selector that does not parse");
            None
        }
    }
}

/// All elements of the document matching `selector`, in document order.
///
/// A selector that does not parse matches nothing.
#[must_use]
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Vec<DomNode<'a>> {
    DomNode(doc.root()).select_all(selector)
}

/// Detach every element matching `selector` from the document.
///
/// Returns the number of elements removed. A selector that does not parse
/// removes nothing.
pub fn remove_all(doc: &Document, selector: &str) -> usize {
    let Some(m) = matcher(selector) else {
        return 0;
    };
    let selection = Selection::from(doc.root()).select_matcher(&m);
    let count = selection.length();
    selection.remove();
    count
}

/// The document body, or the document root when there is none.
#[must_use]
pub fn body(doc: &Document) -> DomNode<'_> {
    select_all(doc, "body")
        .into_iter()
        .next()
        .unwrap_or_else(|| DomNode(doc.root()))
}

/// Text of the document `<title>`, trimmed.
#[must_use]
pub fn document_title(doc: &Document) -> String {
    doc.select("head title").text().trim().to_string()
}

/// Number of element and text nodes under the document root.
///
/// Used to check that extraction leaves the document untouched.
#[must_use]
pub fn node_count(doc: &Document) -> usize {
    DomNode(doc.root()).descendants().len()
}
