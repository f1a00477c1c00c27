//! Simple CLI that reads HTML from stdin and prints its passages as JSON lines.
//!
//! Usage: `recap_extract [settings.json] < page.html`
//!
//! One JSON object is printed per heading a summary would be offered for.
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use recap_passage::{page_passages, Settings};
use serde::Serialize;
use std::io::{self, Read};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output<'a> {
    heading: &'a str,
    level: u8,
    words: usize,
    prev_words: usize,
    text: &'a str,
    prev_text: &'a str,
}

fn load_settings(path: Option<String>) -> Result<Settings, String> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    Settings::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let settings = match load_settings(std::env::args().nth(1)) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = settings.source.exclusion_set().validate() {
        error!("{e}");
        std::process::exit(1);
    }

    // Read HTML from stdin
    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        error!("Failed to read from stdin");
        std::process::exit(1);
    }

    let doc = recap_passage::dom::parse(&html);
    let passages = page_passages(&doc, &settings);
    info!(anchors = passages.len(), "extracted passages");

    for passage in passages
        .iter()
        .filter(|passage| passage.content.offer(settings.min_words))
    {
        let output = Output {
            heading: &passage.heading,
            level: passage.level,
            words: passage.content.words,
            prev_words: passage.content.prev_words,
            text: &passage.content.text,
            prev_text: &passage.content.prev_text,
        };
        println!("{}", serde_json::to_string(&output).unwrap_or_default());
    }
}
