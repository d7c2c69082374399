//! Trade Republic account-statement parser (PDF text).
//!
//! Statement text comes out of the PDF in visual order, so one transaction
//! is often spread over several physical lines. The scan below reassembles
//! logical records before any field extraction happens. Two layouts occur:
//!
//!   02 Jan. 2024 Kauf
//!   MSCI World Acc. 25,00 € 1.225,00 €
//!
//! where the buy/sell marker line is completed by the following line, and
//!
//!   02
//!   Jan.
//!   2024
//!   Überweisung Einzahlung von Max Mustermann 500,00 € 1.250,00 €
//!
//! where the transfer/card line pulls its date from the preceding line(s).

use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

use umsatz_core::locale::{parse_free_date, parse_german_decimal};
use umsatz_core::{Institution, Transaction, normalize_process};

/// Marker inserted between extracted pages; matches no record pattern, so
/// the scan treats it as any other skipped line.
const PAGE_SEPARATOR: &str = "--- Seite ---";
/// A single preceding line at least this long already holds a complete
/// date; shorter fragments mean the date is split over three lines.
const DATE_LINE_CHARS: usize = 8;
/// Amount tokens carry a figure-space + euro suffix.
const AMOUNT_SUFFIX: &str = "\u{a0}€";
/// Fifth-token words marking an incoming transfer.
const INCOMING: &[&str] = &["Einzahlung", "Eingang", "Gutschrift"];

/// Parse already-extracted statement text into transactions.
///
/// Records come back in encounter order, not date order. A reconstructed
/// record whose date tokens do not parse is a hard error: the heuristic has
/// no fallback and assumes well-formed statement text.
pub fn parse_trade_republic_text(text: &str) -> Result<Vec<Transaction>> {
    let lines: Vec<&str> = text.lines().collect();
    let records = reconstruct_records(&lines)?;
    let mut out = Vec::with_capacity(records.len());
    for record in &records {
        out.push(record_to_transaction(record)?);
    }
    debug!("reconstructed {} Trade Republic records", out.len());
    Ok(out)
}

/// Extract a statement PDF page by page and parse the joined text.
pub fn parse_trade_republic_pdf(path: &Path) -> Result<Vec<Transaction>> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .with_context(|| format!("extracting text from {}", path.display()))?;
    let text = pages.join(&format!("\n{PAGE_SEPARATOR}\n"));
    parse_trade_republic_text(&text)
}

/// Reassemble one string per transaction from the visual line stream.
///
/// A buy/sell marker line is always completed by exactly the next line
/// (consume two, advance two). A transfer/card marker line is complete in
/// itself except for the date, which sits on the preceding line when that
/// line is long enough to be a whole date, or on the preceding three lines
/// as day/month/year fragments; either way the scan advances by one. Every
/// other line contributes nothing.
fn reconstruct_records(lines: &[&str]) -> Result<Vec<String>> {
    let buy_sell = Regex::new(r"\bKauf\b|\bVerkauf\b")?;
    let transfer_card = Regex::new(r"\bÜberweisung\b|\bKartenzahlung\b")?;

    let mut records = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if buy_sell.is_match(line) {
            if let Some(next) = lines.get(i + 1) {
                records.push(format!("{} {}", line, next.trim()));
            }
            i += 2;
        } else if transfer_card.is_match(line) {
            let date = if i >= 1 && lines[i - 1].trim().chars().count() >= DATE_LINE_CHARS {
                lines[i - 1].trim().to_string()
            } else if i >= 3 {
                format!(
                    "{} {} {}",
                    lines[i - 3].trim(),
                    lines[i - 2].trim(),
                    lines[i - 1].trim()
                )
            } else {
                String::new()
            };
            records.push(format!("{date} {line}").trim().to_string());
            i += 1;
        } else {
            i += 1;
        }
    }
    Ok(records)
}

fn record_to_transaction(record: &str) -> Result<Transaction> {
    // ASCII-whitespace split keeps the figure-space amount suffix attached
    // to its token.
    let tokens: Vec<&str> = record.split_ascii_whitespace().collect();
    if tokens.len() < 6 {
        bail!("record too short: {record:?}");
    }

    let date = parse_free_date(tokens[0], tokens[1], tokens[2])
        .with_context(|| format!("unparseable date in record {record:?}"))?;

    let native = tokens[3];
    let amount_pos = tokens.len() - 2;
    let amount_raw = tokens[amount_pos]
        .strip_suffix(AMOUNT_SUFFIX)
        .unwrap_or(tokens[amount_pos]);
    let amount = parse_german_decimal(amount_raw)
        .with_context(|| format!("bad amount in record {record:?}"))?;

    let (amount, details) = match native {
        "Überweisung" => {
            let incoming = tokens.get(4).is_some_and(|t| INCOMING.contains(t));
            let details = join_tokens(&tokens, 5, 8.min(amount_pos));
            let amount = if incoming { amount.abs() } else { -amount.abs() };
            (amount, details)
        }
        // Card transactions and buys are always outflows, whatever the
        // extracted sign says.
        "Kartenzahlung" | "Kauf" => (-amount.abs(), join_tokens(&tokens, 4, amount_pos)),
        // Sells and anything unexpected keep their sign as extracted.
        _ => (amount, join_tokens(&tokens, 4, amount_pos)),
    };

    Ok(Transaction {
        date,
        process: normalize_process(Institution::TradeRepublic, native),
        details,
        long_details: None,
        amount,
        datetime: None,
    })
}

fn join_tokens(tokens: &[&str], from: usize, to: usize) -> String {
    let to = to.min(tokens.len());
    if from >= to {
        return String::new();
    }
    tokens[from..to].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use umsatz_core::vocab;

    #[test]
    fn test_buy_marker_consumes_exactly_two_lines() {
        let text = "KONTOAUSZUG\n02 Jan. 2024 Kauf\nMSCI World Acc. 25,00\u{a0}€ 1.225,00\u{a0}€\nSeite 1 von 2\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(row.process, vocab::BUY);
        assert_eq!(row.details, "MSCI World Acc.");
        assert_eq!(row.amount, -25.0);
    }

    #[test]
    fn test_sell_keeps_positive_sign() {
        let text = "03 Feb. 2024 Verkauf\nMSCI World Acc. 120,00\u{a0}€ 1.345,00\u{a0}€\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows[0].process, vocab::SELL);
        assert_eq!(rows[0].amount, 120.0);
    }

    #[test]
    fn test_transfer_with_three_line_date() {
        let text = "02\nJan.\n2024\nÜberweisung Einzahlung von Max Mustermann 500,00\u{a0}€ 1.250,00\u{a0}€\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(row.process, vocab::TRANSFER);
        assert_eq!(row.details, "von Max Mustermann");
        assert_eq!(row.amount, 500.0);
    }

    #[test]
    fn test_transfer_with_single_line_date() {
        let text = "irrelevant\n04 Feb. 2024\nÜberweisung Ausgang an Vermieter GmbH 850,00\u{a0}€ 400,00\u{a0}€\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 2, 4).unwrap());
        assert_eq!(row.details, "an Vermieter GmbH");
        assert_eq!(row.amount, -850.0);
    }

    #[test]
    fn test_card_payment_is_forced_negative() {
        let text = "05 Feb. 2024\nKartenzahlung Kartenzahlung REWE Markt Berlin 12,34\u{a0}€ 387,66\u{a0}€\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows[0].process, vocab::CARD_PAYMENT);
        assert_eq!(rows[0].amount, -12.34);
        assert_eq!(rows[0].details, "Kartenzahlung REWE Markt Berlin");
    }

    #[test]
    fn test_noise_lines_are_skipped() {
        let text = "TRADE REPUBLIC BANK GMBH\nSeite 1 von 3\nDatum 01.02.2024\n";
        let rows = parse_trade_republic_text(text).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unparseable_date_is_a_hard_error() {
        let text = "?? ??? ????\nÜberweisung Ausgang an Niemand 1,00\u{a0}€ 0,00\u{a0}€\n";
        let err = parse_trade_republic_text(text).unwrap_err();
        assert!(err.to_string().contains("unparseable date"));
    }

    #[test]
    fn test_records_stay_in_encounter_order() {
        let text = concat!(
            "05 Feb. 2024\n",
            "Kartenzahlung Kartenzahlung REWE Markt Berlin 12,34\u{a0}€ 387,66\u{a0}€\n",
            "02 Jan. 2024 Kauf\n",
            "MSCI World Acc. 25,00\u{a0}€ 1.225,00\u{a0}€\n",
        );
        let rows = parse_trade_republic_text(text).unwrap();
        assert_eq!(rows.len(), 2);
        // Later booking date first: the parser does not sort.
        assert!(rows[0].date > rows[1].date);
    }
}
