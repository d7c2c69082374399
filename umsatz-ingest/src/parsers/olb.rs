//! OLB account-export parser (headered semicolon CSV).
//!
//! Exports are ISO-8859-15. Unlike comdirect there is no category column,
//! so every row books under the shared `Transfer` label.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use umsatz_core::locale::{parse_german_date, parse_german_decimal, repair_mojibake};
use umsatz_core::{Transaction, vocab};

#[derive(Debug, Deserialize)]
struct OlbRecord {
    #[serde(rename = "Buchungstag")]
    booking_date: String,
    #[serde(rename = "Name Zahlungsbeteiligter")]
    counterparty: String,
    #[serde(rename = "Verwendungszweck")]
    purpose: Option<String>,
    #[serde(rename = "Betrag")]
    amount: String,
}

/// Parse one OLB export already decoded to text.
///
/// Malformed rows are skipped with a warning, never fatal.
pub fn parse_olb_text(text: &str) -> Vec<Transaction> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<OlbRecord>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                warn!("skipping malformed OLB record {}: {}", i + 1, err);
                continue;
            }
        };
        let Some(date) = parse_german_date(&raw.booking_date) else {
            warn!(
                "skipping OLB record {} with bad date {:?}",
                i + 1,
                raw.booking_date
            );
            continue;
        };
        let Some(amount) = parse_german_decimal(&raw.amount) else {
            warn!(
                "skipping OLB record {} with bad amount {:?}",
                i + 1,
                raw.amount
            );
            continue;
        };
        let long_details = raw
            .purpose
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        rows.push(Transaction {
            date,
            process: vocab::TRANSFER.to_string(),
            details: repair_mojibake(raw.counterparty.trim()),
            long_details,
            amount,
            datetime: None,
        });
    }
    debug!("parsed {} OLB rows", rows.len());
    rows
}

/// Read and parse one OLB export file.
pub fn parse_olb_file(path: &Path) -> Result<Vec<Transaction>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let (text, _, _) = encoding_rs::ISO_8859_15.decode(&bytes);
    Ok(parse_olb_text(&text))
}
