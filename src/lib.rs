//! Pagelens — readable-text extraction and bulk IP blacklist checking over HTTP.
//!
//! Two independent pipelines, each invoked synchronously per request:
//! - `/extract`: fetch a URL, strip non-content markup, select a content
//!   region, linearize to plain text.
//! - `/check-ips`: submit a batch of IPs to a blacklist-checking site and
//!   parse the returned HTML table into structured records.

pub mod blacklist;
pub mod extractor;
pub mod server;

/// Round elapsed seconds to two decimal places for response payloads.
pub(crate) fn round2(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(12.999), 13.0);
    }
}
