//! IP blacklist checking pipeline: validate the batch, establish a
//! scraping session, submit the IPs, parse the results table.

pub mod session;
pub mod table;

use crate::round2;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, warn};

pub use session::{BlacklistSession, DEFAULT_BASE_URL};
pub use table::{clean_value, IpCheckRecord};

/// Maximum number of IPs accepted in one batch.
pub const MAX_IPS: usize = 50;

/// Outcome of one `/check-ips` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpCheckOutcome {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<IpCheckRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall-clock seconds for the whole operation, two decimal places.
    pub processing_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Error,
}

impl IpCheckOutcome {
    pub fn success(records: Vec<IpCheckRecord>, elapsed: Duration) -> Self {
        Self {
            status: CheckStatus::Success,
            ip_count: Some(records.len()),
            results: Some(records),
            message: None,
            processing_time: round2(elapsed.as_secs_f64()),
        }
    }

    pub fn error(message: String, elapsed: Duration) -> Self {
        Self {
            status: CheckStatus::Error,
            results: None,
            ip_count: None,
            message: Some(message),
            processing_time: round2(elapsed.as_secs_f64()),
        }
    }
}

/// Validate batch size before any network call.
pub fn validate_ips(ips: &[String]) -> Result<(), String> {
    if ips.is_empty() {
        return Err("No IP addresses provided".to_string());
    }
    if ips.len() > MAX_IPS {
        return Err(format!("Too many IP addresses (maximum {MAX_IPS})"));
    }
    Ok(())
}

/// Run the full check pipeline for one validated batch.
///
/// Never returns an error: failures are folded into an `error` outcome
/// with timing attached.
pub async fn check_ips(base_url: &str, ips: &[String]) -> IpCheckOutcome {
    let started = Instant::now();
    match run_check(base_url, ips).await {
        Ok(records) => IpCheckOutcome::success(records, started.elapsed()),
        Err(err) => {
            error!(error = %err, "error processing IPs");
            IpCheckOutcome::error(err.to_string(), started.elapsed())
        }
    }
}

async fn run_check(base_url: &str, ips: &[String]) -> Result<Vec<IpCheckRecord>> {
    // The session lives for this call only; dropping it on any exit path
    // releases cookies and connections.
    let session = BlacklistSession::new(base_url)?;

    if !session.disable_colorblind_mode().await {
        warn!("could not verify colorblind mode status");
    }

    let html = session.submit_ips(ips).await?;

    // scraper's DOM is not Send; parse off the async thread.
    tokio::task::spawn_blocking(move || table::parse_results_table(&html)).await?
}
