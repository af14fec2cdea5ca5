//! Text extraction pipeline: fetch a URL, strip non-content markup,
//! linearize to plain text.

pub mod fetch;
pub mod text;

use crate::round2;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info};

/// Why an extraction failed.
///
/// Network-layer failures and content/processing failures must stay
/// distinguishable in the reported message.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Connect error, timeout, or non-2xx status from the target server.
    #[error("Request failed: {0}")]
    Request(String),
    /// The server replied with something that is not an HTML document.
    #[error("unsupported content type: {0}")]
    NotHtml(String),
    /// Internal processing failure after the fetch succeeded.
    #[error("processing failed: {0}")]
    Processing(String),
}

/// Outcome of one `/extract` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The URL actually fetched (after scheme normalization).
    pub url: String,
    pub status: ExtractionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock seconds for the whole operation, two decimal places.
    pub processing_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Failed,
}

impl ExtractionResult {
    fn success(url: String, extracted: text::ExtractedText, elapsed: Duration) -> Self {
        Self {
            url,
            status: ExtractionStatus::Success,
            content: Some(extracted.content),
            word_count: Some(extracted.word_count),
            error: None,
            processing_time: round2(elapsed.as_secs_f64()),
        }
    }

    fn failure(url: String, error: String, elapsed: Duration) -> Self {
        Self {
            url,
            status: ExtractionStatus::Failed,
            content: None,
            word_count: None,
            error: Some(error),
            processing_time: round2(elapsed.as_secs_f64()),
        }
    }
}

/// Run the full extraction pipeline for one URL.
///
/// Never returns an error: failures are folded into a `failed` result so
/// the handler can report them with timing attached.
pub async fn extract_text(url: &str) -> ExtractionResult {
    let started = Instant::now();
    let url = fetch::normalize_url(url);
    info!(url = %url, "fetching page");

    match run(&url).await {
        Ok(extracted) => {
            info!(url = %url, words = extracted.word_count, "extraction complete");
            ExtractionResult::success(url, extracted, started.elapsed())
        }
        Err(err) => {
            error!(url = %url, error = %err, "extraction failed");
            ExtractionResult::failure(url, err.to_string(), started.elapsed())
        }
    }
}

async fn run(url: &str) -> Result<text::ExtractedText, ExtractError> {
    let html = fetch::fetch_html(url).await?;
    // scraper's DOM is not Send; parse off the async thread.
    tokio::task::spawn_blocking(move || text::extract_readable_text(&html))
        .await
        .map_err(|e| ExtractError::Processing(e.to_string()))
}
