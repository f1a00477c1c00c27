//! Whole-page content and the anchor list.
//!
//! [`page_content`] backs the "summarize this page" action: one entry per
//! article container with its title and full text. [`AnchorList`] is the
//! per-pass list of headings the in-page UI attaches to, and
//! [`page_passages`] runs passage extraction for every one of them.

use dom_query::Document;
use serde::Serialize;
use tracing::debug;

use crate::container::resolve_containers;
use crate::dom::{self, DomNode};
use crate::materialize::materialize;
use crate::options::{ConfigProvider, ExclusionSet, Settings};
use crate::passage::{PassageContent, PassageExtractor};
use crate::tags::heading_level;
use crate::tree::TreeNode;

/// Prefix of the host id given to each anchor's UI element.
pub const HOST_ID_PREFIX: &str = "recap-passage-";

/// Title and text of one article container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleContent {
    /// Rendered text of the first heading outside excluded content,
    /// or the page title when there is none.
    pub title: String,
    /// Rendered text of the container with exclusions removed.
    pub content: String,
}

/// Title and articles of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageContent {
    /// Page title (single article's title, else the document title).
    pub title: String,
    /// One entry per resolved container, in document order.
    pub articles: Vec<ArticleContent>,
}

/// All `h1`..`h6` below `root`, in document order.
pub fn all_headings<N: TreeNode>(root: &N) -> Vec<N> {
    root.descendants()
        .into_iter()
        .filter(|node| node.tag_name().is_some_and(|tag| heading_level(&tag) > 0))
        .collect()
}

/// Rendered text of the first heading in `container` outside every excluded subtree.
pub fn article_title<N: TreeNode>(container: &N, excludes: &ExclusionSet) -> String {
    all_headings(container)
        .into_iter()
        .find(|heading| !excludes.has_excluded_ancestor(heading))
        .map(|heading| materialize(&heading, &ExclusionSet::default()))
        .unwrap_or_default()
}

/// Title of the page as a whole: the document `<title>`, or the first
/// usable heading of the body when there is none.
#[must_use]
pub fn page_title(doc: &Document, excludes: &ExclusionSet) -> String {
    let title = dom::document_title(doc);
    if title.is_empty() {
        article_title(&dom::body(doc), excludes)
    } else {
        title
    }
}

/// Title and text of every article container on the page.
///
/// Returns `None` while the configuration is not available.
pub fn page_content<P: ConfigProvider + ?Sized>(doc: &Document, provider: &P) -> Option<PageContent> {
    let config = provider.source_text_config()?;
    let excludes = config.exclusion_set();

    let mut content = PageContent::default();
    for container in resolve_containers(doc, &config.article_containers) {
        content.articles.push(ArticleContent {
            title: article_title(&container, &excludes),
            content: materialize(&container, &excludes),
        });
    }

    if let [only] = content.articles.as_slice() {
        content.title.clone_from(&only.title);
    }
    if content.title.is_empty() {
        content.title = page_title(doc, &excludes);
        if let Some(first) = content.articles.first_mut() {
            if first.title.is_empty() {
                first.title.clone_from(&content.title);
            }
        }
    }
    Some(content)
}

/// The headings of one document, collected once per pass.
///
/// Host ids are positions in this list, so they stay stable for as long as
/// the list is kept.
#[derive(Debug, Clone)]
pub struct AnchorList<N> {
    anchors: Vec<N>,
}

impl<N: TreeNode> AnchorList<N> {
    /// Collect every heading below `root`.
    pub fn collect(root: &N) -> Self {
        let anchors = all_headings(root);
        debug!(count = anchors.len(), "collected heading anchors");
        Self { anchors }
    }

    /// Anchors in document order.
    #[must_use]
    pub fn anchors(&self) -> &[N] {
        &self.anchors
    }

    /// Number of anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no heading was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Host id of `anchor`, `recap-passage-{index}`.
    #[must_use]
    pub fn host_id(&self, anchor: &N) -> Option<String> {
        self.anchors
            .iter()
            .position(|node| node == anchor)
            .map(|index| format!("{HOST_ID_PREFIX}{index}"))
    }
}

impl<'a> AnchorList<DomNode<'a>> {
    /// Collect every heading of the document body.
    #[must_use]
    pub fn from_document(doc: &'a Document) -> Self {
        Self::collect(&dom::body(doc))
    }
}

/// One anchor of a page with its passage content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorPassage {
    /// Stable id of the anchor's UI host within this pass.
    pub host_id: String,
    /// Rendered heading text.
    pub heading: String,
    /// Heading level, 1-6.
    pub level: u8,
    /// Visibility and texts, flattened into the record when serialized.
    #[serde(flatten)]
    pub content: PassageContent,
}

/// Passage content for every heading of the document.
///
/// Anchors that are not shown are included with `show == false`; use
/// [`PassageContent::offer`] to pick the ones a summary is offered for.
#[must_use]
pub fn page_passages(doc: &Document, settings: &Settings) -> Vec<AnchorPassage> {
    let containers = resolve_containers(doc, &settings.source.article_containers);
    let list = AnchorList::from_document(doc);
    let extractor = PassageExtractor::new();

    list.anchors()
        .iter()
        .enumerate()
        .filter_map(|(index, anchor)| {
            let content = extractor.content(anchor, &containers, settings)?;
            Some(AnchorPassage {
                host_id: format!("{HOST_ID_PREFIX}{index}"),
                heading: materialize(anchor, &ExclusionSet::default()),
                level: anchor.tag_name().map_or(0, |tag| heading_level(&tag)),
                content,
            })
        })
        .collect()
}
