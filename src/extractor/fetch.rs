//! Page fetching for the text extractor.
//!
//! Fetches a URL with a browser-like User-Agent and a hard timeout, and
//! rejects responses whose declared content type is not HTML.

use super::ExtractError;
use reqwest::header;
use std::time::Duration;

/// Browser-like User-Agent sent on every outbound request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Hard timeout for the whole fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Prepend `https://` when the URL has no scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Fetch a URL and return its HTML body.
///
/// Network failures, timeouts, and non-2xx statuses map to
/// [`ExtractError::Request`]; a non-HTML declared content type maps to
/// [`ExtractError::NotHtml`].
pub async fn fetch_html(url: &str) -> Result<String, ExtractError> {
    let url = url::Url::parse(url).map_err(|e| ExtractError::Request(format!("invalid URL: {e}")))?;

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| ExtractError::Request(e.to_string()))?;

    let response = client
        .get(url)
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .send()
        .await
        .map_err(|e| ExtractError::Request(e.to_string()))?
        .error_for_status()
        .map_err(|e| ExtractError::Request(e.to_string()))?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        let declared = if content_type.is_empty() {
            "unknown".to_string()
        } else {
            content_type
        };
        return Err(ExtractError::NotHtml(declared));
    }

    response
        .text()
        .await
        .map_err(|e| ExtractError::Request(e.to_string()))
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}
