//! Institution-specific statement parsers and the shared parse-all contract.

pub mod comdirect;
pub mod olb;
pub mod trade_republic;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use umsatz_core::{Institution, Transaction, finalize};

use crate::discover::find_export_files;

/// Parse every export for `institution` into one finalized table.
///
/// `files` overrides discovery; otherwise `dir` is scanned with the
/// institution's naming convention. Zero matching files is not an error and
/// yields an empty table. Per-file tables are concatenated, then
/// deduplicated and date-sorted.
///
/// Row-level problems in the delimited formats are recovered (row skipped
/// with a warning); a statement PDF whose reconstructed dates do not parse
/// fails the whole call, as does an unreadable file.
pub fn parse_all(
    institution: Institution,
    dir: &Path,
    files: Option<&[PathBuf]>,
) -> Result<Vec<Transaction>> {
    let files: Vec<PathBuf> = match files {
        Some(list) => list.to_vec(),
        None => find_export_files(institution, dir),
    };

    let mut rows = Vec::new();
    for path in &files {
        let parsed = match institution {
            Institution::Comdirect => comdirect::parse_comdirect_file(path)?,
            Institution::TradeRepublic => trade_republic::parse_trade_republic_pdf(path)?,
            Institution::Olb => olb::parse_olb_file(path)?,
        };
        rows.extend(parsed);
    }
    debug!(
        "parsed {} rows from {} {} file(s)",
        rows.len(),
        files.len(),
        institution.label()
    );
    Ok(finalize(rows))
}
