//! # recap-passage
//!
//! Heading-bounded passage extraction from web pages.
//!
//! Given a heading on a page, this library computes the text of the passage
//! it opens (up to the next heading of the same or a higher level) and the
//! text of everything before it, leaving excluded subtrees such as `nav`,
//! `aside` or `footer` out. The page itself is never modified: each call cuts
//! a detached clone of the relevant range and flattens that to text.
//!
//! ## Quick Start
//!
//! ```rust
//! use recap_passage::{compute_passage_text, compute_preceding_text, dom, ExclusionSet};
//!
//! let doc = dom::parse(
//!     r#"<div id="c"><h2 id="a">A</h2><p>x</p><h2 id="b">B</h2><p>y</p></div>"#,
//! );
//! let container = dom::select_all(&doc, "#c")[0];
//! let a = dom::select_all(&doc, "#a")[0];
//! let b = dom::select_all(&doc, "#b")[0];
//! let excludes = ExclusionSet::default();
//!
//! assert_eq!(compute_passage_text(&a, &container, &excludes), "A\nx");
//! assert_eq!(compute_preceding_text(&b, &container, &excludes), "A\nx");
//! assert_eq!(compute_passage_text(&b, &container, &excludes), "B\ny");
//! ```
//!
//! ## Layout
//!
//! - [`container`] picks the article container(s) of a page
//! - [`passage`] finds boundaries and computes passage/preceding text
//! - [`subtree`] cuts the synthetic subtree between two node paths
//! - [`materialize`] flattens nodes and fragments into rendered text
//! - [`page`] gives whole-page content and the per-pass anchor list
//! - [`summary`] carries extracted text to a summarization backend

mod error;
mod options;
mod patterns;

/// Tag classification tables.
pub mod tags;

/// Tree capability trait, node paths and detached fragments.
pub mod tree;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Bounded subtree extraction between two node paths.
pub mod subtree;

/// Rendered text of nodes and synthetic subtrees.
pub mod materialize;

/// Article container resolution.
pub mod container;

/// Passage boundaries, visibility and text.
pub mod passage;

/// Whole-page content and the heading anchor list.
pub mod page;

/// Prompt composition, provider traits and summary status.
pub mod summary;

// Public API - re-exports
pub use container::{container_of, resolve_containers};
pub use error::{Error, Result};
pub use materialize::{materialize, MarkupText, Materializer, TextMeasure};
pub use options::{
    ConfigProvider, ExclusionSet, HeadingAnchor, Settings, SourceTextConfig, StoredConfig,
    BUILTIN_EXCLUDES, DEFAULT_PROMPT, UI_HOST_TAG,
};
pub use page::{page_content, page_passages, AnchorList, AnchorPassage, ArticleContent, PageContent};
pub use passage::{
    compute_passage_text, compute_preceding_text, find_boundary, passage_content, should_show,
    PassageContent, PassageExtractor,
};
pub use subtree::extract_bounded_subtree;
pub use tree::{Fragment, NodePath, TreeNode};
