//! Result-table parsing for the blacklist checker.
//!
//! The target site renders one `<table class="table">` with a header row
//! followed by one row per submitted IP. Column order is an external,
//! unversioned contract: index, ip, ptr record, spamcop, spamhaus,
//! barracuda, sender score, sender base, and an optional trailing api cell.

use anyhow::{bail, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Minimum cell count for a row to be accepted.
const MIN_CELLS: usize = 8;

/// One parsed row of the blacklist results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpCheckRecord {
    /// Row index as rendered by the site. Parsed for fidelity, unused
    /// downstream.
    pub index: String,
    pub ip: String,
    pub ptr_record: String,
    pub spamcop: String,
    pub spamhaus: String,
    pub barracuda: String,
    pub sender_score: String,
    pub sender_base: String,
    /// Trailing api cell; "N/A" when the row has exactly eight cells.
    pub api: String,
}

/// Normalize a boolean-ish verdict cell.
///
/// The site renders verdicts as "Yes"/"No" text, a checkmark glyph when
/// colorblind mode is on, or occasionally a free-text explanation. Empty
/// and glyph cells collapse to "No"; case variants of yes/no collapse to
/// canonical form; anything else passes through unchanged.
pub fn clean_value(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() || text == "✓" {
        return "No".to_string();
    }
    if text.eq_ignore_ascii_case("yes") {
        return "Yes".to_string();
    }
    if text.eq_ignore_ascii_case("no") {
        return "No".to_string();
    }
    text.to_string()
}

/// Parse the results table out of a response page.
///
/// Rows with fewer than eight cells are silently skipped; a missing table
/// or a table with no data rows is a hard error.
pub fn parse_results_table(html: &str) -> Result<Vec<IpCheckRecord>> {
    let (Ok(table_selector), Ok(row_selector), Ok(cell_selector)) = (
        Selector::parse("table.table"),
        Selector::parse("tr"),
        Selector::parse("td"),
    ) else {
        bail!("invalid selector");
    };

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_selector).next() else {
        bail!("Results table not found");
    };

    let rows: Vec<_> = table.select(&row_selector).collect();
    if rows.len() < 2 {
        bail!("No data rows found");
    }

    let mut records = Vec::new();
    for row in rows.into_iter().skip(1) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < MIN_CELLS {
            continue;
        }
        records.push(IpCheckRecord {
            index: cell_text(cells[0]),
            ip: cell_text(cells[1]),
            ptr_record: cell_text(cells[2]),
            spamcop: clean_value(&cell_text(cells[3])),
            spamhaus: clean_value(&cell_text(cells[4])),
            barracuda: clean_value(&cell_text(cells[5])),
            sender_score: cell_text(cells[6]),
            sender_base: cell_text(cells[7]),
            api: cells
                .get(8)
                .map(|cell| cell_text(*cell))
                .unwrap_or_else(|| "N/A".to_string()),
        });
    }

    Ok(records)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
