//! Page-level integration tests
//!
//! Whole-page content, the anchor list, and per-page passage runs driven by
//! settings loaded from JSON.

use recap_passage::dom;
use recap_passage::summary::{AbortSignal, ProviderError, SummaryEvent, SummarySink, Summarizer};
use recap_passage::{page_content, page_passages, AnchorList, Settings, SourceTextConfig};

const BLOG: &str = r#"
<html><head><title>My Blog</title></head>
<body>
  <nav><h2>Navigation</h2><a href="/">Home</a></nav>
  <main>
    <article>
      <h2>Release notes</h2>
      <p>Version two is out with many changes.</p>
      <h3>Fixes</h3>
      <p>Crash on start fixed.</p>
    </article>
    <article>
      <p>A post without its own heading.</p>
    </article>
  </main>
  <footer><p>Copyright</p></footer>
</body></html>"#;

#[test]
fn test_page_content_per_article() {
    let doc = dom::parse(BLOG);
    let Some(content) = page_content(&doc, &SourceTextConfig::default()) else {
        panic!("config is ready");
    };

    assert_eq!(content.title, "My Blog");
    assert_eq!(content.articles.len(), 2);
    assert_eq!(content.articles[0].title, "Release notes");
    assert_eq!(
        content.articles[0].content,
        "Release notes\nVersion two is out with many changes.\nFixes\nCrash on start fixed."
    );
    assert_eq!(content.articles[1].title, "");
    assert_eq!(content.articles[1].content, "A post without its own heading.");
}

#[test]
fn test_page_content_single_container_body() {
    let doc = dom::parse(
        r#"<html><head><title>Doc</title></head><body>
        <nav>menu</nav><div><p>no headings at all</p></div></body></html>"#,
    );
    let Some(content) = page_content(&doc, &SourceTextConfig::default()) else {
        panic!("config is ready");
    };

    assert_eq!(content.title, "Doc");
    assert_eq!(content.articles.len(), 1);
    assert_eq!(content.articles[0].title, "Doc");
    assert_eq!(content.articles[0].content, "no headings at all");
}

#[test]
fn test_page_content_serializes() {
    let doc = dom::parse("<html><head><title>T</title></head><body><p>x</p></body></html>");
    let Some(content) = page_content(&doc, &SourceTextConfig::default()) else {
        panic!("config is ready");
    };

    let json = serde_json::to_string(&content).unwrap_or_default();
    assert_eq!(json, r#"{"title":"T","articles":[{"title":"T","content":"x"}]}"#);
}

#[test]
fn test_anchor_list_covers_whole_body() {
    let doc = dom::parse(BLOG);
    let list = AnchorList::from_document(&doc);

    assert_eq!(list.len(), 3);
    let ids: Vec<_> = list.anchors().iter().filter_map(|a| list.host_id(a)).collect();
    assert_eq!(ids, vec!["recap-passage-0", "recap-passage-1", "recap-passage-2"]);
}

#[test]
fn test_page_passages_with_settings_json() {
    let doc = dom::parse(BLOG);
    let Ok(settings) = Settings::from_json(r#"{"headingAnchor":"h3","minWords":5}"#) else {
        panic!("settings parse");
    };
    let passages = page_passages(&doc, &settings);

    let shown: Vec<_> = passages.iter().filter(|p| p.content.show).map(|p| p.heading.as_str()).collect();
    assert_eq!(shown, vec!["Release notes", "Fixes"]);

    let offered: Vec<_> = passages
        .iter()
        .filter(|p| p.content.offer(settings.min_words))
        .map(|p| p.heading.as_str())
        .collect();
    assert_eq!(offered, vec!["Release notes"]);

    let fixes = &passages[2];
    assert_eq!(fixes.host_id, "recap-passage-2");
    assert_eq!(fixes.level, 3);
    assert_eq!(fixes.content.text, "Fixes\nCrash on start fixed.");
    assert_eq!(
        fixes.content.prev_text,
        "Release notes\nVersion two is out with many changes."
    );
}

#[test]
fn test_passage_record_json_shape() {
    let doc = dom::parse("<body><h2>Head</h2><p>one two</p></body>");
    let passages = page_passages(&doc, &Settings::default());

    let Ok(value) = serde_json::to_value(&passages[0]) else {
        panic!("record serializes");
    };
    assert_eq!(value["host_id"], "recap-passage-0");
    assert_eq!(value["heading"], "Head");
    assert_eq!(value["level"], 2);
    assert_eq!(value["show"], true);
    assert_eq!(value["words"], 3);
    assert_eq!(value["text"], "Head\none two");
    assert_eq!(value["prev_text"], "");
}

struct Capitalize;

impl Summarizer for Capitalize {
    fn do_summarize(
        &mut self,
        request: &str,
        sink: &mut dyn SummarySink,
        _signal: &AbortSignal,
    ) -> Result<(), ProviderError> {
        sink.on_finish(&request.to_uppercase());
        Ok(())
    }
}

#[test]
fn test_passage_text_reaches_summarizer_verbatim() {
    let doc = dom::parse("<body><h2>Head</h2><p>some words</p><h2>Next</h2></body>");
    let settings = Settings {
        prompt: "tl;dr".to_string(),
        ..Settings::default()
    };
    let passages = page_passages(&doc, &settings);

    struct Prompted<'a>(&'a str, Capitalize);
    impl Summarizer for Prompted<'_> {
        fn prompt(&self) -> &str {
            self.0
        }
        fn do_summarize(
            &mut self,
            request: &str,
            sink: &mut dyn SummarySink,
            signal: &AbortSignal,
        ) -> Result<(), ProviderError> {
            self.1.do_summarize(request, sink, signal)
        }
    }

    let mut events: Vec<SummaryEvent> = Vec::new();
    Prompted(&settings.prompt, Capitalize).summarize(&passages[0].content.text, &mut events, &AbortSignal::new());

    assert_eq!(events, vec![SummaryEvent::Finish("TL;DR\n\nHEAD\nSOME WORDS".to_string())]);
}
