//! Per-request scraping session against the blacklist site.
//!
//! Each `/check-ips` request builds its own cookie-bearing client and
//! discards it when the request finishes; nothing is shared across
//! requests. Dropping the session releases cookies and connections on
//! every exit path.

use crate::extractor::fetch::USER_AGENT;
use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{info, warn};

/// Production base URL of the blacklist-checking site.
pub const DEFAULT_BASE_URL: &str = "https://www.bulkblacklist.com";

/// Hard timeout for every call against the site.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(20);

/// A cookie-bearing session scoped to one `/check-ips` request.
pub struct BlacklistSession {
    client: reqwest::Client,
    base_url: String,
}

impl BlacklistSession {
    /// Build a session against `base_url` (no trailing slash required).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_str(&base_url).context("invalid blacklist base URL")?,
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&format!("{base_url}/"))
                .context("invalid blacklist base URL")?,
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .context("failed to build blacklist HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Force the site's colorblind mode off so verdict cells render as
    /// plain Yes/No text instead of glyphs.
    ///
    /// The endpoint is a toggle, so it is hit twice to land back on the
    /// off state. Best-effort: failure is logged and the caller proceeds
    /// with degraded value normalization.
    pub async fn disable_colorblind_mode(&self) -> bool {
        let url = format!("{}/toggle-colorblind-mode", self.base_url);
        for _ in 0..2 {
            let outcome = self
                .client
                .post(&url)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            if let Err(err) = outcome {
                warn!(error = %err, "error toggling colorblind mode");
                return false;
            }
        }
        true
    }

    /// Submit the IP list as a single newline-joined form field and
    /// return the response page.
    pub async fn submit_ips(&self, ips: &[String]) -> Result<String> {
        info!(count = ips.len(), "submitting IPs for checking");
        let body = ips.join("\n");

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .form(&[("ips", body.as_str())])
            .send()
            .await
            .context("Network error submitting IPs")?
            .error_for_status()
            .context("blacklist site returned an error status")?;

        response
            .text()
            .await
            .context("failed to read blacklist response")
    }
}
