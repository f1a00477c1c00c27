//! Article container resolution.
//!
//! Candidate selectors are tried in order. Several matches mean a listing
//! page: each match is its own article container. A single match usually
//! wraps the whole layout, so the body is used instead. No match at all also
//! falls back to the body.

use dom_query::Document;
use tracing::debug;

use crate::dom::{self, DomNode};
use crate::tree::TreeNode;

/// Resolve article containers against any tree.
///
/// `query` returns the matches of one selector in document order. The result
/// is never empty.
pub fn resolve_from<N, S, F>(body: N, candidates: &[S], mut query: F) -> Vec<N>
where
    N: TreeNode,
    S: AsRef<str>,
    F: FnMut(&str) -> Vec<N>,
{
    for candidate in candidates {
        let selector = candidate.as_ref().trim();
        if selector.is_empty() {
            continue;
        }
        let matches = query(selector);
        match matches.len() {
            0 => debug!(selector, "container candidate matched nothing"),
            1 => {
                debug!(selector, "single article page, using body");
                return vec![body];
            }
            count => {
                debug!(selector, count, "multiple article containers");
                return matches;
            }
        }
    }
    debug!("no container candidate matched, using body");
    vec![body]
}

/// Resolve the article containers of a parsed document.
///
/// A selector that does not parse matches nothing.
#[must_use]
pub fn resolve_containers<'a, S: AsRef<str>>(doc: &'a Document, candidates: &[S]) -> Vec<DomNode<'a>> {
    resolve_from(dom::body(doc), candidates, |selector| {
        dom::select_all(doc, selector)
    })
}

/// The innermost container holding `anchor`, if any.
pub fn container_of<'c, N: TreeNode>(anchor: &N, containers: &'c [N]) -> Option<&'c N> {
    let mut current = Some(anchor.clone());
    while let Some(node) = current {
        if let Some(container) = containers.iter().find(|container| **container == node) {
            return Some(container);
        }
        current = node.parent();
    }
    None
}
