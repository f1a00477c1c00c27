//! Bounded subtree extraction.
//!
//! Answers one question: what does `root`'s subtree look like once everything
//! strictly before a start node and everything at or after an end node is
//! deleted? The answer is a detached [`Fragment`]; the host tree is only read.
//!
//! ## Shape of the result
//!
//! ```text
//!            root                      root'          (shallow)
//!           /    \                    /    \
//!         a        b        =>      a'      b'        (shallow: on a path)
//!       / | \    / | \             / \    /
//!      x START y z END w        START' y  z           (deep: fully inside)
//! ```
//!
//! Nodes on a boundary path keep their tag and attributes but only the
//! children that fall inside the range. Nodes entirely inside the range are
//! copied with all of their descendants.

use crate::error::{Error, Result};
use crate::tree::{Fragment, NodePath, TreeNode};

/// Extract the part of `root`'s subtree between two boundaries.
///
/// * `start` - path to the first kept node (inclusive), or `None` to keep
///   everything from the beginning of `root`.
/// * `end` - path to the first dropped node (exclusive), or `None` to keep
///   everything up to the end of `root`.
///
/// Both paths must end at `root`. An empty path counts as "no boundary on
/// this side". Ranges that select nothing (end before start, end containing
/// start, start equal to end) yield the shallow ancestor chain with no text.
///
/// # Errors
///
/// [`Error::InvalidBoundary`] when both paths are `None`, or a non-empty path
/// does not end at `root`.
pub fn extract_bounded_subtree<N: TreeNode>(
    root: &N,
    start: Option<&NodePath<N>>,
    end: Option<&NodePath<N>>,
) -> Result<Fragment> {
    if start.is_none() && end.is_none() {
        return Err(Error::InvalidBoundary(
            "neither a start nor an end path was supplied".to_string(),
        ));
    }
    for (side, path) in [("start", start), ("end", end)] {
        if let Some(path) = path {
            if !path.is_empty() && !path.ends_at(root) {
                return Err(Error::InvalidBoundary(format!(
                    "{side} path does not end at the extraction root"
                )));
            }
        }
    }

    let start = start.filter(|p| !p.is_empty()).map(NodePath::root_first);
    let end = end.filter(|p| !p.is_empty()).map(NodePath::root_first);

    let fragment = match (start.as_deref(), end.as_deref()) {
        (Some(start), Some(end)) => between(start, end),
        (Some(start), None) => below(start),
        (None, Some(end)) => above(end),
        (None, None) => None,
    };
    Ok(fragment.unwrap_or_else(|| root.clone_shallow()))
}

/// Everything from the chain's target (inclusive) to the end of the chain's root.
fn below<N: TreeNode>(chain: &[N]) -> Option<Fragment> {
    let (target, _) = chain.split_last()?;

    // One shallow layer per ancestor, holding the siblings after the path.
    let mut layers = Vec::new();
    for (node, next) in chain.iter().zip(chain.iter().skip(1)) {
        let children = node.children();
        let Some(index) = position(&children, next) else {
            return Some(nest(layers, node.clone_shallow()));
        };
        let following = children[index + 1..]
            .iter()
            .map(TreeNode::clone_deep)
            .collect();
        layers.push((node.clone_shallow(), following));
    }

    Some(nest(layers, target.clone_deep()))
}

/// Everything from the start of the chain's root up to the target (exclusive).
///
/// `None` when the chain is just the target: nothing of it is kept.
fn above<N: TreeNode>(chain: &[N]) -> Option<Fragment> {
    let mut layers = Vec::new();
    for (node, next) in chain.iter().zip(chain.iter().skip(1)) {
        let mut layer = node.clone_shallow();
        let children = node.children();
        let Some(index) = position(&children, next) else {
            layers.push(layer);
            break;
        };
        for sibling in &children[..index] {
            layer.push(sibling.clone_deep());
        }
        layers.push(layer);
    }
    layers.into_iter().rev().reduce(|inner, mut outer| {
        outer.push(inner);
        outer
    })
}

/// Fold `inner` into `layers` (outermost first). Each layer takes the
/// nested result as its first child, followed by its own siblings.
fn nest(layers: Vec<(Fragment, Vec<Fragment>)>, inner: Fragment) -> Fragment {
    layers.into_iter().rev().fold(inner, |child, (mut layer, following)| {
        layer.push(child);
        for sibling in following {
            layer.push(sibling);
        }
        layer
    })
}

/// The range between two root-first chains that share their first node.
fn between<N: TreeNode>(start: &[N], end: &[N]) -> Option<Fragment> {
    let shared = start
        .iter()
        .zip(end)
        .take_while(|(s, e)| s == e)
        .count();
    if shared == 0 {
        return None;
    }

    let (ancestors, start_rest) = start.split_at(shared - 1);
    let end_rest = &end[shared - 1..];
    let lca = start_rest.first()?;

    let inner = match (start_rest.get(1), end_rest.get(1)) {
        // Start is the LCA: it contains the end (or is the end).
        (None, _) => above(end_rest).unwrap_or_else(|| lca.clone_shallow()),
        // End contains start: the end opens before the start, nothing is kept.
        (Some(_), None) => lca.clone_shallow(),
        (Some(start_child), Some(end_child)) => {
            let mut fragment = lca.clone_shallow();
            let children = lca.children();
            if let (Some(first), Some(last)) =
                (position(&children, start_child), position(&children, end_child))
            {
                // An end child before the start child is an empty range.
                if first < last {
                    if let Some(head) = below(&start_rest[1..]) {
                        fragment.push(head);
                    }
                    for sibling in &children[first + 1..last] {
                        fragment.push(sibling.clone_deep());
                    }
                    if let Some(tail) = above(&end_rest[1..]) {
                        fragment.push(tail);
                    }
                }
            }
            fragment
        }
    };

    Some(wrap(ancestors, inner))
}

/// Re-nest `inner` under shallow copies of `ancestors` (root first).
fn wrap<N: TreeNode>(ancestors: &[N], inner: Fragment) -> Fragment {
    ancestors.iter().rev().fold(inner, |child, ancestor| {
        let mut fragment = ancestor.clone_shallow();
        fragment.push(child);
        fragment
    })
}

fn position<N: TreeNode>(children: &[N], node: &N) -> Option<usize> {
    children.iter().position(|child| child == node)
}
