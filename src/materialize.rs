//! Text materialization.
//!
//! Turns a node, or a detached [`Fragment`], into the text a reader would see:
//! excluded subtrees dropped, hidden and non-rendered elements skipped, one
//! line per block, inline white space collapsed.
//!
//! Matching exclusion selectors needs a real tree with ancestry, so detached
//! clones are first attached to a [`ScratchDocument`] (a throwaway document
//! built from the clone), pruned there, measured, and dropped before the call
//! returns.

use dom_query::{Document, NodeId, NodeRef};

use crate::dom::{self, DomNode};
use crate::options::ExclusionSet;
use crate::patterns::{COLLAPSIBLE_WHITESPACE, HIDDEN_STYLE, HORIZONTAL_WHITESPACE};
use crate::tags::{self, BLOCK_TAG_SET, NON_RENDERED_TAG_SET};
use crate::tree::{Fragment, TreeNode};

/// Capability that computes the rendered text of a node.
///
/// A browser host reads `innerText` of an attached node; [`MarkupText`]
/// derives the same shape from markup alone.
pub trait TextMeasure {
    /// Rendered text of `node` and its descendants, before normalization.
    fn measure_rendered_text<N: TreeNode>(&self, node: &N) -> String;
}

/// Rendered text computed from markup, without layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupText;

impl TextMeasure for MarkupText {
    fn measure_rendered_text<N: TreeNode>(&self, node: &N) -> String {
        let mut renderer = TextRenderer::default();
        renderer.render(node);
        renderer.out
    }
}

#[derive(Default)]
struct TextRenderer {
    out: String,
    pending_break: bool,
    preformatted: usize,
}

enum Step<N> {
    Enter(N),
    Leave { block: bool, pre: bool },
}

impl TextRenderer {
    fn render<N: TreeNode>(&mut self, root: &N) {
        let mut stack = vec![Step::Enter(root.clone())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => self.enter(&node, &mut stack),
                Step::Leave { block, pre } => {
                    if pre {
                        self.preformatted -= 1;
                    }
                    if block {
                        self.soft_break();
                    }
                }
            }
        }
    }

    fn enter<N: TreeNode>(&mut self, node: &N, stack: &mut Vec<Step<N>>) {
        if node.is_text() {
            self.push_text(&node.text_value());
            return;
        }
        if let Some(tag) = node.tag_name() {
            if !is_rendered(node, &tag) {
                return;
            }
            if tag == "br" {
                self.hard_break();
                return;
            }
            if tags::is_cell(&tag) {
                self.cell_gap();
            }

            let block = BLOCK_TAG_SET.contains(tag.as_str());
            let pre = tag == "pre";
            if block {
                self.soft_break();
            }
            if pre {
                self.preformatted += 1;
            }
            stack.push(Step::Leave { block, pre });
        }
        stack.extend(node.children().into_iter().rev().map(Step::Enter));
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn soft_break(&mut self) {
        if !self.at_line_start() {
            self.pending_break = true;
        }
    }

    fn hard_break(&mut self) {
        if self.pending_break {
            self.end_line();
        }
        self.end_line();
    }

    fn end_line(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
        self.out.push('\n');
        self.pending_break = false;
    }

    fn cell_gap(&mut self) {
        if !self.pending_break && !self.at_line_start() && !self.out.ends_with(' ') {
            self.out.push(' ');
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.preformatted > 0 {
            if text.is_empty() {
                return;
            }
            if self.pending_break {
                self.end_line();
            }
            self.out.push_str(text);
            return;
        }

        let collapsed = COLLAPSIBLE_WHITESPACE.replace_all(text, " ");
        let mut text: &str = &collapsed;
        if self.pending_break || self.at_line_start() {
            text = text.trim_start_matches(' ');
        }
        if text.is_empty() {
            return;
        }
        if self.pending_break {
            self.end_line();
        }
        if self.out.ends_with(' ') {
            text = text.trim_start_matches(' ');
        }
        self.out.push_str(text);
    }
}

fn is_rendered<N: TreeNode>(node: &N, tag: &str) -> bool {
    if NON_RENDERED_TAG_SET.contains(tag) {
        return false;
    }
    !node.attributes().iter().any(|(key, value)| {
        key == "hidden" || (key == "style" && HIDDEN_STYLE.is_match(value))
    })
}

/// Collapse runs of spaces and tabs to one space and trim the ends.
/// Newlines are kept.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    HORIZONTAL_WHITESPACE
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// A detached clone attached to a throwaway document for measurement.
///
/// The clone is rebuilt node by node under an `html`/`body` shell of its own
/// document, so elements that only parse in table or list context keep
/// their tag and attributes. The live document is never touched. Dropping
/// the scratch document detaches it.
pub struct ScratchDocument {
    document: Document,
    root: NodeId,
}

impl ScratchDocument {
    /// Attach a detached clone.
    #[must_use]
    pub fn attach(fragment: Fragment) -> Self {
        let document = Document::default();
        let root = {
            let mut parent = document.root();
            if fragment.name() != Some("html") {
                let html = document.tree.new_element("html");
                parent.append_child(&html);
                parent = html;
                if !matches!(fragment.name(), Some("head" | "body")) {
                    let body = document.tree.new_element("body");
                    parent.append_child(&body);
                    parent = body;
                }
            }
            append_fragment(&document, parent, &fragment)
        };
        Self { document, root }
    }

    /// The attached clone's root node.
    #[must_use]
    pub fn root(&self) -> DomNode<'_> {
        self.document
            .tree
            .get(&self.root)
            .map_or_else(|| dom::body(&self.document), DomNode::new)
    }

    /// Remove every element matching an exclusion selector.
    pub fn remove_excluded(&self, excludes: &ExclusionSet) {
        for selector in excludes.selectors() {
            dom::remove_all(&self.document, selector);
        }
    }
}

/// Build `fragment` under `parent`, returning the id of its root.
fn append_fragment<'a>(document: &'a Document, parent: NodeRef<'a>, fragment: &Fragment) -> NodeId {
    let root = create_node(document, fragment);
    parent.append_child(&root);

    let mut stack = vec![(root, fragment.children())];
    while let Some((node, children)) = stack.pop() {
        for child in children {
            let created = create_node(document, child);
            node.append_child(&created);
            stack.push((created, child.children()));
        }
    }
    root.id
}

fn create_node<'a>(document: &'a Document, fragment: &Fragment) -> NodeRef<'a> {
    match fragment {
        Fragment::Text(text) => document.tree.new_text(text.as_str()),
        Fragment::Element { name, attrs, .. } => {
            let element = document.tree.new_element(name);
            for (key, value) in attrs {
                element.set_attr(key, value);
            }
            element
        }
    }
}

/// Flattens nodes and synthetic subtrees into display text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Materializer<M = MarkupText> {
    measure: M,
}

impl Materializer<MarkupText> {
    /// Materializer using [`MarkupText`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasure> Materializer<M> {
    /// Materializer using a custom text measure.
    #[must_use]
    pub fn with_measure(measure: M) -> Self {
        Self { measure }
    }

    /// Rendered, normalized text of `node` with excluded subtrees removed.
    ///
    /// The node is only cloned when it actually contains excluded content.
    pub fn materialize<N: TreeNode>(&self, node: &N, excludes: &ExclusionSet) -> String {
        if excludes.matches(node) {
            return String::new();
        }
        if excludes.has_excluded_descendant(node) {
            let scratch = ScratchDocument::attach(node.clone_deep());
            return self.measure_scratch(&scratch, excludes);
        }
        normalize_text(&self.measure.measure_rendered_text(node))
    }

    /// Rendered, normalized text of a synthetic subtree.
    ///
    /// The fragment is owned, so it is pruned in place without another clone.
    pub fn materialize_fragment(&self, fragment: Fragment, excludes: &ExclusionSet) -> String {
        let scratch = ScratchDocument::attach(fragment);
        if excludes.matches(&scratch.root()) {
            return String::new();
        }
        self.measure_scratch(&scratch, excludes)
    }

    fn measure_scratch(&self, scratch: &ScratchDocument, excludes: &ExclusionSet) -> String {
        scratch.remove_excluded(excludes);
        normalize_text(&self.measure.measure_rendered_text(&scratch.root()))
    }
}

/// Rendered text of `node` with excluded subtrees removed, using [`MarkupText`].
#[must_use]
pub fn materialize<N: TreeNode>(node: &N, excludes: &ExclusionSet) -> String {
    Materializer::new().materialize(node, excludes)
}
