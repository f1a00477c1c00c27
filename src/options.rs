//! Configuration for passage extraction.
//!
//! `SourceTextConfig` carries what the extractor needs per page: candidate
//! article containers, excluded subtrees and the heading anchor level.
//! `Settings` adds the presentation knobs (minimum words, prompt).
//! `StoredConfig` mirrors the persisted key/value shape, where any key may be
//! missing while storage is still loading.
//!
//! # Example
//!
//! ```rust
//! use recap_passage::{HeadingAnchor, SourceTextConfig};
//!
//! let config = SourceTextConfig {
//!     heading_anchor: HeadingAnchor::H3,
//!     ..SourceTextConfig::default()
//! };
//! assert_eq!(config.heading_anchor.level(), 3);
//! assert_eq!(config.article_containers, vec!["article", "body"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::TreeNode;

/// Tag of the host element the in-page UI is mounted in.
pub const UI_HOST_TAG: &str = "recap-csui";

/// Selectors excluded on every page in addition to the configured ones.
pub const BUILTIN_EXCLUDES: [&str; 2] = [UI_HOST_TAG, ".sr-only"];

/// Default prompt placed before the passage text.
pub const DEFAULT_PROMPT: &str = "Summarize this text:";

/// Heading level that anchors passages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingAnchor {
    /// `h1`
    H1,
    /// `h2`
    #[default]
    H2,
    /// `h3`
    H3,
    /// `h4`
    H4,
    /// `h5`
    H5,
    /// `h6`
    H6,
}

impl HeadingAnchor {
    /// All anchors, coarsest first.
    pub const ALL: [HeadingAnchor; 6] = [
        HeadingAnchor::H1,
        HeadingAnchor::H2,
        HeadingAnchor::H3,
        HeadingAnchor::H4,
        HeadingAnchor::H5,
        HeadingAnchor::H6,
    ];

    /// Numeric level, 1-6.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }

    /// Anchor for a numeric level.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|anchor| anchor.level() == level)
    }

    /// Tag name, e.g. `"h2"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        crate::tags::HEADING_TAGS[usize::from(self.level() - 1)]
    }

    /// Whether this is the coarsest (`h1`) or finest (`h6`) setting.
    #[must_use]
    pub fn is_extreme(self) -> bool {
        matches!(self, Self::H1 | Self::H6)
    }
}

/// Per-page source text configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceTextConfig {
    /// Candidate article container selectors, tried in order.
    ///
    /// Default: `["article", "body"]`
    pub article_containers: Vec<String>,

    /// Selectors of subtrees left out of extracted text.
    ///
    /// Default: `["aside", "footer", "nav"]`
    pub exclude_containers: Vec<String>,

    /// Heading level that anchors passages.
    ///
    /// Default: `h2`
    pub heading_anchor: HeadingAnchor,
}

impl Default for SourceTextConfig {
    fn default() -> Self {
        Self {
            article_containers: vec!["article".to_string(), "body".to_string()],
            exclude_containers: vec!["aside".to_string(), "footer".to_string(), "nav".to_string()],
            heading_anchor: HeadingAnchor::H2,
        }
    }
}

impl SourceTextConfig {
    /// Exclusion set for this config, built-in excludes included.
    #[must_use]
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::new(&self.exclude_containers)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Source text configuration.
    #[serde(flatten)]
    pub source: SourceTextConfig,

    /// Passages with at most this many words are not offered.
    ///
    /// Default: `0`
    pub min_words: usize,

    /// Prompt placed before the text sent for summarization.
    ///
    /// Default: `"Summarize this text:"`
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceTextConfig::default(),
            min_words: 0,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Settings {
    /// Parse settings JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(StoredConfig::from_json(json)?.with_defaults())
    }
}

/// Persisted configuration as read from storage; any key may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    /// Stored article container selectors.
    pub article_containers: Option<Vec<String>>,
    /// Stored exclusion selectors.
    pub exclude_containers: Option<Vec<String>>,
    /// Stored heading anchor.
    pub heading_anchor: Option<HeadingAnchor>,
    /// Stored minimum word count.
    pub min_words: Option<usize>,
    /// Stored prompt.
    pub prompt: Option<String>,
}

impl StoredConfig {
    /// Parse the persisted JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Resolve into settings, filling absent keys with defaults.
    #[must_use]
    pub fn with_defaults(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            source: SourceTextConfig {
                article_containers: self
                    .article_containers
                    .unwrap_or(defaults.source.article_containers),
                exclude_containers: self
                    .exclude_containers
                    .unwrap_or(defaults.source.exclude_containers),
                heading_anchor: self.heading_anchor.unwrap_or(defaults.source.heading_anchor),
            },
            min_words: self.min_words.unwrap_or(defaults.min_words),
            prompt: self.prompt.unwrap_or(defaults.prompt),
        }
    }
}

/// Read-only source of the per-page configuration.
///
/// `None` means "not ready yet": callers skip extraction instead of guessing.
pub trait ConfigProvider {
    /// Current source text configuration, if fully available.
    fn source_text_config(&self) -> Option<SourceTextConfig>;
}

impl ConfigProvider for SourceTextConfig {
    fn source_text_config(&self) -> Option<SourceTextConfig> {
        Some(self.clone())
    }
}

impl ConfigProvider for Option<SourceTextConfig> {
    fn source_text_config(&self) -> Option<SourceTextConfig> {
        self.clone()
    }
}

impl ConfigProvider for Settings {
    fn source_text_config(&self) -> Option<SourceTextConfig> {
        Some(self.source.clone())
    }
}

impl ConfigProvider for StoredConfig {
    fn source_text_config(&self) -> Option<SourceTextConfig> {
        Some(SourceTextConfig {
            article_containers: self.article_containers.clone()?,
            exclude_containers: self.exclude_containers.clone()?,
            heading_anchor: self.heading_anchor?,
        })
    }
}

/// Ordered set of CSS selectors whose subtrees are left out of extracted text.
///
/// Each entry may itself be a comma-separated selector list. Entries are
/// matched one at a time, so one malformed entry does not disable the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    selectors: Vec<String>,
}

impl ExclusionSet {
    /// Configured selectors followed by [`BUILTIN_EXCLUDES`].
    /// Blank and duplicate entries are dropped.
    #[must_use]
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        let mut set = Self::only(selectors);
        for builtin in BUILTIN_EXCLUDES {
            set.insert(builtin);
        }
        set
    }

    /// Exactly the given selectors, without the built-in excludes.
    #[must_use]
    pub fn only<S: AsRef<str>>(selectors: &[S]) -> Self {
        let mut set = Self::default();
        for selector in selectors {
            set.insert(selector.as_ref());
        }
        set
    }

    fn insert(&mut self, selector: &str) {
        let selector = selector.trim();
        if !selector.is_empty() && !self.selectors.iter().any(|s| s == selector) {
            self.selectors.push(selector.to_string());
        }
    }

    /// Selectors in order.
    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Whether the set has no selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Whether `node` itself matches any selector.
    pub fn matches<N: TreeNode>(&self, node: &N) -> bool {
        self.selectors.iter().any(|selector| node.matches(selector))
    }

    /// Whether `node` or any of its ancestors matches.
    pub fn has_excluded_ancestor<N: TreeNode>(&self, node: &N) -> bool {
        let mut current = Some(node.clone());
        while let Some(node) = current {
            if self.matches(&node) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Whether any descendant of `node` matches.
    pub fn has_excluded_descendant<N: TreeNode>(&self, node: &N) -> bool {
        self.selectors
            .iter()
            .any(|selector| !node.select_all(selector).is_empty())
    }

    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        for selector in &self.selectors {
            if crate::dom::Matcher::new(selector).is_err() {
                return Err(Error::InvalidSelector(selector.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_default_source_text_config() {
        let config = SourceTextConfig::default();

        assert_eq!(config.article_containers, vec!["article", "body"]);
        assert_eq!(config.exclude_containers, vec!["aside", "footer", "nav"]);
        assert_eq!(config.heading_anchor, HeadingAnchor::H2);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.min_words, 0);
        assert_eq!(settings.prompt, "Summarize this text:");
    }

    #[test]
    fn test_heading_anchor_levels() {
        for level in 1..=6 {
            let anchor = HeadingAnchor::from_level(level).unwrap();
            assert_eq!(anchor.level(), level);
            assert_eq!(anchor.as_str(), format!("h{level}"));
        }
        assert!(HeadingAnchor::from_level(0).is_none());
        assert!(HeadingAnchor::from_level(7).is_none());
        assert!(HeadingAnchor::H1.is_extreme());
        assert!(HeadingAnchor::H6.is_extreme());
        assert!(!HeadingAnchor::H3.is_extreme());
    }

    #[test]
    fn test_settings_from_json_partial() {
        let settings = Settings::from_json(r#"{"headingAnchor":"h3","minWords":20}"#).unwrap();

        assert_eq!(settings.source.heading_anchor, HeadingAnchor::H3);
        assert_eq!(settings.min_words, 20);
        assert_eq!(settings.source.article_containers, vec!["article", "body"]);
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_settings_from_json_rejects_bad_anchor() {
        let err = Settings::from_json(r#"{"headingAnchor":"h9"}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_settings_serde_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(json["articleContainers"][0], "article");
        assert_eq!(json["headingAnchor"], "h2");
        assert_eq!(json["minWords"], 0);
    }

    #[test]
    fn test_stored_config_not_ready_until_complete() {
        let mut stored = StoredConfig {
            article_containers: Some(vec!["main".into()]),
            exclude_containers: Some(vec![]),
            ..StoredConfig::default()
        };
        assert!(stored.source_text_config().is_none());

        stored.heading_anchor = Some(HeadingAnchor::H4);
        let config = stored.source_text_config().unwrap();
        assert_eq!(config.article_containers, vec!["main"]);
        assert_eq!(config.heading_anchor, HeadingAnchor::H4);
    }

    #[test]
    fn test_option_provider() {
        let missing: Option<SourceTextConfig> = None;
        assert!(missing.source_text_config().is_none());
        assert!(Some(SourceTextConfig::default()).source_text_config().is_some());
    }

    #[test]
    fn test_exclusion_set_appends_builtins_and_dedups() {
        let set = ExclusionSet::new(&["nav", " nav ", "", ".sr-only"]);

        assert_eq!(set.selectors(), &["nav", ".sr-only", UI_HOST_TAG]);
    }

    #[test]
    fn test_exclusion_set_only() {
        let set = ExclusionSet::only(&["aside"]);
        assert_eq!(set.selectors(), &["aside"]);
        assert!(ExclusionSet::only::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_exclusion_matching() {
        let doc = dom::parse(
            r#"<div id="c"><nav><p id="in-nav">x</p></nav><p id="out">y</p><aside class="box"></aside></div>"#,
        );
        let set = ExclusionSet::only(&["nav", ".box, .other"]);
        let container = dom::select_all(&doc, "#c")[0];
        let in_nav = dom::select_all(&doc, "#in-nav")[0];
        let out = dom::select_all(&doc, "#out")[0];

        assert!(set.has_excluded_ancestor(&in_nav));
        assert!(!set.has_excluded_ancestor(&out));
        assert!(!set.matches(&container));
        assert!(set.has_excluded_descendant(&container));
        assert!(!set.has_excluded_descendant(&out));
    }

    #[test]
    fn test_malformed_selector_does_not_disable_others() {
        let doc = dom::parse(r#"<div id="c"><nav>x</nav></div>"#);
        let set = ExclusionSet::only(&["p[", "nav"]);

        assert!(set.has_excluded_descendant(&dom::select_all(&doc, "#c")[0]));
        assert_eq!(set.validate(), Err(Error::InvalidSelector("p[".into())));
        assert!(ExclusionSet::new(&["nav", "article .ad"]).validate().is_ok());
    }
}
