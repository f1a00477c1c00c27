//! Summarization plumbing.
//!
//! The extractor hands its text to a [`Summarizer`], which streams partial
//! results, a final result or an error into a [`SummarySink`]. Between
//! contexts these travel as [`SummaryEvent`] JSON messages, and the in-page
//! side folds them into a [`SummaryContent`].
//!
//! Transport and concrete providers live outside this crate.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::options::DEFAULT_PROMPT;

/// Message shown while the provider connection is being set up.
pub const CONNECTING_MESSAGE: &str = "connecting to provider...";

/// Prompt and text joined into one provider request.
#[must_use]
pub fn compose_prompt(prompt: &str, text: &str) -> String {
    format!("{}\n\n{text}", prompt.trim())
}

/// Failure category reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderErrorCode {
    /// Anything not covered below.
    UnknownError,
    /// The provider rejected the session or credentials.
    Unauthorized,
    /// No API key is configured.
    ApiKeyNotSet,
    /// The provider answered with an error.
    BackendError,
    /// The request did not reach the provider.
    RequestError,
}

impl ProviderErrorCode {
    /// Wire name, e.g. `"API_KEY_NOT_SET"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ApiKeyNotSet => "API_KEY_NOT_SET",
            Self::BackendError => "BACKEND_ERROR",
            Self::RequestError => "REQUEST_ERROR",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by a summarization provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Failure category.
    pub code: ProviderErrorCode,
    /// Human-readable detail.
    pub message: String,
}

impl ProviderError {
    /// Error with an explicit code.
    #[must_use]
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Uncategorized failure.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::UnknownError, message)
    }
}

/// Cancellation flag shared between the caller and a running summary.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// A signal that has not been raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`abort`](Self::abort) was called on this signal or a clone.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receiver of a streamed summary.
pub trait SummarySink {
    /// Partial result so far.
    fn on_result(&mut self, result: &str);
    /// Final result.
    fn on_finish(&mut self, result: &str);
    /// The summary failed.
    fn on_error(&mut self, error: &ProviderError);
}

/// A summarization backend.
pub trait Summarizer {
    /// Prompt placed before the text.
    fn prompt(&self) -> &str {
        DEFAULT_PROMPT
    }

    /// Send one composed request and stream the answer into `sink`.
    ///
    /// # Errors
    ///
    /// Any provider failure. Uncategorized failures after `signal` was aborted
    /// are treated as the abort itself.
    fn do_summarize(
        &mut self,
        request: &str,
        sink: &mut dyn SummarySink,
        signal: &AbortSignal,
    ) -> Result<(), ProviderError>;

    /// Summarize `text`, reporting failures through `sink`.
    ///
    /// A user abort is not an error and is not reported.
    fn summarize(&mut self, text: &str, sink: &mut dyn SummarySink, signal: &AbortSignal) {
        let request = compose_prompt(self.prompt(), text);
        if let Err(err) = self.do_summarize(&request, sink, signal) {
            if err.code == ProviderErrorCode::UnknownError && signal.is_aborted() {
                debug!(%err, "summary aborted");
                return;
            }
            warn!(%err, "summary failed");
            sink.on_error(&err);
        }
    }
}

/// Message sent from the summarizing context to the page.
///
/// Serializes as `{"result": ..}`, `{"finish": ..}` or
/// `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryEvent {
    /// Partial summary so far.
    Result(String),
    /// Complete summary.
    Finish(String),
    /// Provider failure.
    Error(ProviderError),
}

impl SummaryEvent {
    /// Parse one JSON message.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ConfigError`] when the message is not a summary event.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::ConfigError(e.to_string()))
    }
}

impl SummarySink for Vec<SummaryEvent> {
    fn on_result(&mut self, result: &str) {
        self.push(SummaryEvent::Result(result.to_string()));
    }

    fn on_finish(&mut self, result: &str) {
        self.push(SummaryEvent::Finish(result.to_string()));
    }

    fn on_error(&mut self, error: &ProviderError) {
        self.push(SummaryEvent::Error(error.clone()));
    }
}

/// Progress of one summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    /// Requested, no output yet.
    Loading,
    /// Partial results are arriving.
    Generating,
    /// The final result arrived.
    Finish,
    /// The provider failed.
    Error,
}

impl SummaryStatus {
    /// Still waiting for output.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Loading | Self::Generating)
    }

    /// No further events are expected.
    #[must_use]
    pub fn is_done(self) -> bool {
        matches!(self, Self::Finish | Self::Error)
    }
}

/// Latest state of one summary as seen by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryContent {
    /// Where the summary is in its lifecycle.
    pub status: SummaryStatus,
    /// Latest text: the connecting message, partial result or final result.
    pub text: String,
    /// Set once the provider fails.
    pub error: Option<ProviderError>,
}

impl SummaryContent {
    /// State right after a summary was requested.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: SummaryStatus::Loading,
            text: CONNECTING_MESSAGE.to_string(),
            error: None,
        }
    }

    /// Fold one event into the state.
    ///
    /// Events arriving after the summary is done are ignored.
    pub fn apply(&mut self, event: SummaryEvent) {
        if self.status.is_done() {
            debug!(status = ?self.status, "event after summary finished");
            return;
        }
        match event {
            SummaryEvent::Result(text) => {
                self.status = SummaryStatus::Generating;
                self.text = text;
            }
            SummaryEvent::Finish(text) => {
                self.status = SummaryStatus::Finish;
                self.text = text;
            }
            SummaryEvent::Error(error) => {
                self.status = SummaryStatus::Error;
                self.error = Some(error);
            }
        }
    }

    /// Whether a new request should be started for this slot.
    ///
    /// Only a slot that never started or ended in an error is restarted.
    #[must_use]
    pub fn needs_start(current: Option<&Self>) -> bool {
        current.is_none_or(|content| content.status == SummaryStatus::Error)
    }
}
