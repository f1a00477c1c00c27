//! Passage extraction.
//!
//! A passage starts at an anchor heading and runs up to, but not including,
//! the next heading of the same or a higher level inside the container. The
//! preceding text is everything in the container before the anchor.
//!
//! Both are synthetic subtrees cut from the container with
//! [`extract_bounded_subtree`] and flattened by the [`Materializer`]:
//!
//! ```text
//! passage   = bounded(container, start = path(anchor), end = path(boundary)?)
//! preceding = bounded(container, start = None,         end = path(anchor))
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::container::container_of;
use crate::materialize::{Materializer, MarkupText, TextMeasure};
use crate::options::{ConfigProvider, ExclusionSet, SourceTextConfig};
use crate::subtree::extract_bounded_subtree;
use crate::tags::heading_level;
use crate::tree::{NodePath, TreeNode};

/// The node that ends the passage started by `anchor`, if any.
///
/// For a heading of level `n` this is the next `h1`..`hn` in the container in
/// document order. For any other element it is the next element with the
/// same tag.
pub fn find_boundary<N: TreeNode>(anchor: &N, container: &N) -> Option<N> {
    let tag = anchor.tag_name()?;
    let level = heading_level(&tag);
    let qualifies = |node: &N| match node.tag_name() {
        Some(name) if level > 0 => (1..=level).contains(&heading_level(&name)),
        Some(name) => name == tag,
        None => false,
    };

    let boundary = container
        .descendants()
        .into_iter()
        .filter(|node| qualifies(node))
        .skip_while(|node| node != anchor)
        .nth(1);
    debug!(anchor = %tag, found = boundary.is_some(), "boundary lookup");
    boundary
}

/// Whether the passage action is shown for `anchor`.
///
/// Coarsest and finest anchor settings match their level exactly; the others
/// accept any heading at or above the configured level. Anchors under an
/// excluded subtree, and non-headings, are never shown.
pub fn should_show<N: TreeNode>(anchor: &N, config: &SourceTextConfig, excludes: &ExclusionSet) -> bool {
    let level = anchor.tag_name().map_or(0, |tag| heading_level(&tag));
    if level == 0 {
        return false;
    }
    let configured = config.heading_anchor;
    let level_ok = if configured.is_extreme() {
        level == configured.level()
    } else {
        level <= configured.level()
    };
    level_ok && !excludes.has_excluded_ancestor(anchor)
}

/// Number of white-space separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Everything the in-page UI needs for one anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassageContent {
    /// Whether the passage action is shown at all.
    pub show: bool,
    /// Text of the passage starting at the anchor.
    pub text: String,
    /// Text of the container before the anchor.
    pub prev_text: String,
    /// Words in `text`.
    pub words: usize,
    /// Words in `prev_text`.
    pub prev_words: usize,
}

impl PassageContent {
    /// Whether a summary is offered: shown, and longer than `min_words`.
    #[must_use]
    pub fn offer(&self, min_words: usize) -> bool {
        self.show && self.words > min_words
    }
}

/// Computes passage and preceding text with a given text measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassageExtractor<M = MarkupText> {
    materializer: Materializer<M>,
}

impl PassageExtractor<MarkupText> {
    /// Extractor using markup-derived rendered text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasure> PassageExtractor<M> {
    /// Extractor using a custom text measure.
    #[must_use]
    pub fn with_measure(measure: M) -> Self {
        Self {
            materializer: Materializer::with_measure(measure),
        }
    }

    /// Text from `anchor` up to the next qualifying heading.
    ///
    /// Empty when `anchor` is not inside `container`.
    pub fn passage_text<N: TreeNode>(&self, anchor: &N, container: &N, excludes: &ExclusionSet) -> String {
        let Some(start) = NodePath::to_root(anchor, container) else {
            warn!("anchor is not inside its container");
            return String::new();
        };
        let end = find_boundary(anchor, container)
            .and_then(|boundary| NodePath::to_root(&boundary, container));
        self.bounded_text(container, Some(&start), end.as_ref(), excludes)
    }

    /// Text of `container` before `anchor`.
    ///
    /// Empty when `anchor` is not inside `container`.
    pub fn preceding_text<N: TreeNode>(&self, anchor: &N, container: &N, excludes: &ExclusionSet) -> String {
        let Some(end) = NodePath::to_root(anchor, container) else {
            warn!("anchor is not inside its container");
            return String::new();
        };
        self.bounded_text(container, None, Some(&end), excludes)
    }

    /// Visibility plus both texts for `anchor`.
    ///
    /// Returns `None` while the configuration is not available. Texts are
    /// empty when `anchor` lies outside every container.
    pub fn content<N, P>(&self, anchor: &N, containers: &[N], provider: &P) -> Option<PassageContent>
    where
        N: TreeNode,
        P: ConfigProvider + ?Sized,
    {
        let config = provider.source_text_config()?;
        let excludes = config.exclusion_set();
        let show = should_show(anchor, &config, &excludes);

        let (text, prev_text) = match container_of(anchor, containers) {
            Some(container) => (
                self.passage_text(anchor, container, &excludes),
                self.preceding_text(anchor, container, &excludes),
            ),
            None => {
                warn!("could not find container up the tree");
                (String::new(), String::new())
            }
        };

        Some(PassageContent {
            show,
            words: word_count(&text),
            prev_words: word_count(&prev_text),
            text,
            prev_text,
        })
    }

    fn bounded_text<N: TreeNode>(
        &self,
        container: &N,
        start: Option<&NodePath<N>>,
        end: Option<&NodePath<N>>,
        excludes: &ExclusionSet,
    ) -> String {
        match extract_bounded_subtree(container, start, end) {
            Ok(fragment) => self.materializer.materialize_fragment(fragment, excludes),
            Err(err) => {
                warn!(%err, "bounded subtree extraction failed");
                String::new()
            }
        }
    }
}

/// Passage text of `anchor` using [`MarkupText`].
#[must_use]
pub fn compute_passage_text<N: TreeNode>(anchor: &N, container: &N, excludes: &ExclusionSet) -> String {
    PassageExtractor::new().passage_text(anchor, container, excludes)
}

/// Preceding text of `anchor` using [`MarkupText`].
#[must_use]
pub fn compute_preceding_text<N: TreeNode>(anchor: &N, container: &N, excludes: &ExclusionSet) -> String {
    PassageExtractor::new().preceding_text(anchor, container, excludes)
}

/// [`PassageExtractor::content`] using [`MarkupText`].
pub fn passage_content<N, P>(anchor: &N, containers: &[N], provider: &P) -> Option<PassageContent>
where
    N: TreeNode,
    P: ConfigProvider + ?Sized,
{
    PassageExtractor::new().content(anchor, containers, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, DomNode};
    use crate::options::HeadingAnchor;

    const PAGE: &str = r#"<div id="c">
        <h1 id="t">Title</h1><p>intro</p>
        <h2 id="a">A</h2><p>a1</p>
        <h3 id="a1">A.1</h3><p>a11</p>
        <h2 id="b">B</h2><p>b1</p>
        <aside><h2 id="side">Side</h2></aside>
    </div>"#;

    fn node<'a>(doc: &'a dom::Document, selector: &str) -> DomNode<'a> {
        dom::select_all(doc, selector)[0]
    }

    fn id(node: Option<DomNode<'_>>) -> Option<String> {
        node.and_then(|n| n.attribute("id"))
    }

    fn config(anchor: HeadingAnchor) -> SourceTextConfig {
        SourceTextConfig {
            heading_anchor: anchor,
            ..SourceTextConfig::default()
        }
    }

    #[test]
    fn test_boundary_same_or_higher_level() {
        let doc = dom::parse(PAGE);
        let c = node(&doc, "#c");

        assert_eq!(id(find_boundary(&node(&doc, "#a"), &c)), Some("b".into()));
        assert_eq!(id(find_boundary(&node(&doc, "#a1"), &c)), Some("b".into()));
        assert_eq!(id(find_boundary(&node(&doc, "#t"), &c)), None);
        assert_eq!(id(find_boundary(&node(&doc, "#b"), &c)), Some("side".into()));
    }

    #[test]
    fn test_boundary_for_non_heading_uses_same_tag() {
        let doc = dom::parse(r#"<div id="c"><p id="p1">x</p><div><span>s</span></div><p id="p2">y</p></div>"#);
        let c = node(&doc, "#c");

        assert_eq!(id(find_boundary(&node(&doc, "#p1"), &c)), Some("p2".into()));
        assert_eq!(id(find_boundary(&node(&doc, "#p2"), &c)), None);
    }

    #[test]
    fn test_should_show_levels() {
        let doc = dom::parse(PAGE);
        let excludes = config(HeadingAnchor::H2).exclusion_set();
        let (t, a, a1) = (node(&doc, "#t"), node(&doc, "#a"), node(&doc, "#a1"));

        let h2 = config(HeadingAnchor::H2);
        assert!(should_show(&t, &h2, &excludes));
        assert!(should_show(&a, &h2, &excludes));
        assert!(!should_show(&a1, &h2, &excludes));

        let h1 = config(HeadingAnchor::H1);
        assert!(should_show(&t, &h1, &excludes));
        assert!(!should_show(&a, &h1, &excludes));

        let h6 = config(HeadingAnchor::H6);
        assert!(!should_show(&a, &h6, &excludes));
        assert!(!should_show(&a1, &h6, &excludes));
    }

    #[test]
    fn test_should_show_excluded_ancestor_and_non_heading() {
        let doc = dom::parse(PAGE);
        let cfg = config(HeadingAnchor::H3);
        let excludes = cfg.exclusion_set();

        assert!(!should_show(&node(&doc, "#side"), &cfg, &excludes));
        assert!(!should_show(&node(&doc, "p"), &cfg, &excludes));
    }

    #[test]
    fn test_passage_includes_subheadings() {
        let doc = dom::parse(PAGE);
        let c = node(&doc, "#c");
        let text = compute_passage_text(&node(&doc, "#a"), &c, &ExclusionSet::new(&["aside"]));

        assert_eq!(text, "A\na1\nA.1\na11");
    }

    #[test]
    fn test_last_passage_runs_to_end_minus_excluded() {
        let doc = dom::parse(PAGE);
        let c = node(&doc, "#c");
        let anchor = node(&doc, "#b");
        let excludes = ExclusionSet::new(&["aside"]);

        // the boundary lies inside the excluded aside
        assert_eq!(compute_passage_text(&anchor, &c, &excludes), "B\nb1");
    }

    #[test]
    fn test_preceding_text() {
        let doc = dom::parse(PAGE);
        let c = node(&doc, "#c");

        assert_eq!(
            compute_preceding_text(&node(&doc, "#a1"), &c, &ExclusionSet::default()),
            "Title\nintro\nA\na1"
        );
        assert_eq!(compute_preceding_text(&node(&doc, "#t"), &c, &ExclusionSet::default()), "");
    }

    #[test]
    fn test_anchor_outside_container_is_empty() {
        let doc = dom::parse(r#"<div id="c"><h2>in</h2></div><h2 id="out">out</h2>"#);
        let c = node(&doc, "#c");
        let out = node(&doc, "#out");

        assert_eq!(compute_passage_text(&out, &c, &ExclusionSet::default()), "");
        assert_eq!(compute_preceding_text(&out, &c, &ExclusionSet::default()), "");
    }

    #[test]
    fn test_content_not_ready() {
        let doc = dom::parse(PAGE);
        let containers = vec![node(&doc, "#c")];
        let provider: Option<SourceTextConfig> = None;

        assert!(passage_content(&node(&doc, "#a"), &containers, &provider).is_none());
    }

    #[test]
    fn test_content_counts_words() {
        let doc = dom::parse(PAGE);
        let containers = vec![node(&doc, "#c")];
        let content = passage_content(&node(&doc, "#a"), &containers, &config(HeadingAnchor::H2));

        let Some(content) = content else {
            panic!("config is ready");
        };
        assert!(content.show);
        assert_eq!(content.text, "A\na1\nA.1\na11");
        assert_eq!(content.prev_text, "Title\nintro");
        assert_eq!(content.words, 4);
        assert_eq!(content.prev_words, 2);
        assert!(content.offer(3));
        assert!(!content.offer(4));
    }

    #[test]
    fn test_content_outside_containers() {
        let doc = dom::parse(r#"<article id="c"><h2 id="a">A</h2></article><h2 id="o">O</h2>"#);
        let containers = vec![node(&doc, "#c")];
        let content = passage_content(&node(&doc, "#o"), &containers, &SourceTextConfig::default());

        assert_eq!(
            content,
            Some(PassageContent {
                show: true,
                ..PassageContent::default()
            })
        );
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one\ntwo \t three "), 3);
    }
}
