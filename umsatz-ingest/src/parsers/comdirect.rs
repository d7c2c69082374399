//! comdirect account-export parser (semicolon CSV).
//!
//! Exports are Windows-1252 with six report-header lines before the data.
//! Data rows have six columns; the first and last carry nothing we keep:
//!
//!   "01.03.2024";"01.03.2024";"Übertrag / Überweisung";"Miete März";"-850,00";""
//!
//! `--` marks an empty cell. The trailing balance lines of a report have no
//! booking date and are dropped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use umsatz_core::locale::{parse_german_date, parse_german_decimal, repair_mojibake};
use umsatz_core::{Institution, Transaction, normalize_process};

/// Report-header lines before the first data row.
const HEADER_LINES: usize = 6;
/// Token comdirect writes for an empty cell.
const NULL_TOKEN: &str = "--";
/// `details` keeps at most this many characters; longer booking text moves
/// to `long_details` untruncated.
const DETAILS_CHARS: usize = 30;

/// Parse one comdirect export already decoded to text.
///
/// Malformed rows are skipped with a warning; only I/O-level problems are
/// fatal, so this never fails.
pub fn parse_comdirect_text(text: &str) -> Vec<Transaction> {
    let data: String = text
        .lines()
        .skip(HEADER_LINES)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping malformed comdirect record {}: {}", i + 1, err);
                continue;
            }
        };
        match record_to_transaction(&record) {
            Ok(Some(txn)) => rows.push(txn),
            Ok(None) => {} // no booking date, e.g. the closing balance line
            Err(err) => warn!("skipping comdirect record {}: {}", i + 1, err),
        }
    }
    debug!("parsed {} comdirect rows", rows.len());
    rows
}

fn record_to_transaction(record: &csv::StringRecord) -> Result<Option<Transaction>> {
    // Columns: discarded; booking date; process; booking text; amount; discarded.
    let date_raw = record.get(1).unwrap_or("").trim();
    if date_raw.is_empty() || date_raw == NULL_TOKEN {
        return Ok(None);
    }
    let date = parse_german_date(date_raw).with_context(|| format!("bad date {date_raw:?}"))?;

    let process_raw = record.get(2).unwrap_or("").trim();
    if process_raw.is_empty() || process_raw == NULL_TOKEN {
        bail!("missing process label");
    }

    let amount_raw = record.get(4).unwrap_or("").trim();
    if amount_raw == NULL_TOKEN {
        bail!("missing amount");
    }
    let amount =
        parse_german_decimal(amount_raw).with_context(|| format!("bad amount {amount_raw:?}"))?;

    let process = normalize_process(Institution::Comdirect, &repair_mojibake(process_raw));

    let full = record.get(3).unwrap_or("").trim();
    let truncated = full.chars().count() > DETAILS_CHARS;
    let details: String = full.chars().take(DETAILS_CHARS).collect();
    let long_details = truncated.then(|| full.to_string());

    Ok(Some(Transaction {
        date,
        process,
        details,
        long_details,
        amount,
        datetime: None,
    }))
}

/// Read and parse one comdirect export file.
pub fn parse_comdirect_file(path: &Path) -> Result<Vec<Transaction>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    Ok(parse_comdirect_text(&text))
}
