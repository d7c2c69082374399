//! Shared process vocabulary and per-institution normalization tables.
//!
//! Each institution names the same booking kinds differently; the tables
//! below fold those native labels onto one shared set so the combined view
//! can filter across sources. Labels the table does not know pass through
//! verbatim: a new bank-side category stays visible instead of disappearing
//! into a catch-all.

use tracing::warn;

use crate::transaction::Institution;

/// The shared cross-institution vocabulary.
pub mod vocab {
    pub const TRANSFER: &str = "Transfer";
    pub const CARD_PAYMENT: &str = "Card Payment";
    pub const DIRECT_DEBIT: &str = "Direct Debit";
    pub const CASH_WITHDRAWAL: &str = "Cash Withdrawal";
    pub const ACCOUNT_FEE: &str = "Account Fee";
    pub const INTEREST: &str = "Interest";
    pub const BUY: &str = "Buy";
    pub const SELL: &str = "Sell";

    /// Every shared label, for membership checks and filter widgets.
    pub const ALL: &[&str] = &[
        TRANSFER,
        CARD_PAYMENT,
        DIRECT_DEBIT,
        CASH_WITHDRAWAL,
        ACCOUNT_FEE,
        INTEREST,
        BUY,
        SELL,
    ];
}

const COMDIRECT: &[(&str, &str)] = &[
    ("Übertrag / Überweisung", vocab::TRANSFER),
    ("Überweisung", vocab::TRANSFER),
    ("Dauerauftrag", vocab::TRANSFER),
    ("Lastschrift / Belastung", vocab::DIRECT_DEBIT),
    ("Visa-Umsatz", vocab::CARD_PAYMENT),
    ("Visa-Kartenabrechnung", vocab::CARD_PAYMENT),
    ("Auszahlung GAA", vocab::CASH_WITHDRAWAL),
    ("Kontoführung", vocab::ACCOUNT_FEE),
    ("Zinsen / Kontoführung", vocab::INTEREST),
];

const TRADE_REPUBLIC: &[(&str, &str)] = &[
    ("Überweisung", vocab::TRANSFER),
    ("Kartenzahlung", vocab::CARD_PAYMENT),
    ("Kauf", vocab::BUY),
    ("Verkauf", vocab::SELL),
    ("Zinsen", vocab::INTEREST),
];

// The OLB export carries no category column; its parser books everything
// under one fixed shared label instead of consulting a table.
const OLB: &[(&str, &str)] = &[];

fn table(institution: Institution) -> &'static [(&'static str, &'static str)] {
    match institution {
        Institution::Comdirect => COMDIRECT,
        Institution::TradeRepublic => TRADE_REPUBLIC,
        Institution::Olb => OLB,
    }
}

/// Map a native process label onto the shared vocabulary.
///
/// Unmapped labels are returned verbatim and logged, so vocabulary drift on
/// the bank side is observable rather than silent. Shared labels are fixed
/// points, which makes the mapping idempotent.
pub fn normalize_process(institution: Institution, native: &str) -> String {
    let native = native.trim();
    if let Some((_, shared)) = table(institution).iter().find(|(raw, _)| *raw == native) {
        return (*shared).to_string();
    }
    if !native.is_empty() && !vocab::ALL.contains(&native) {
        warn!(
            "unmapped {} process label passing through: {:?}",
            institution.label(),
            native
        );
    }
    native.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_labels_converge() {
        assert_eq!(
            normalize_process(Institution::Comdirect, "Übertrag / Überweisung"),
            vocab::TRANSFER
        );
        assert_eq!(
            normalize_process(Institution::TradeRepublic, "Überweisung"),
            vocab::TRANSFER
        );
    }

    #[test]
    fn test_unmapped_label_passes_through() {
        assert_eq!(
            normalize_process(Institution::Comdirect, "Wertpapierverkauf"),
            "Wertpapierverkauf"
        );
    }

    #[test]
    fn test_idempotent() {
        for (native, _) in COMDIRECT.iter().chain(TRADE_REPUBLIC) {
            let once = normalize_process(Institution::Comdirect, native);
            let twice = normalize_process(Institution::Comdirect, &once);
            assert_eq!(once, twice, "label {:?} is not a fixed point", native);
        }
        // Unmapped labels are stable fixed points too.
        let once = normalize_process(Institution::Olb, "Sonderbuchung");
        assert_eq!(normalize_process(Institution::Olb, &once), once);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            normalize_process(Institution::TradeRepublic, " Kartenzahlung "),
            vocab::CARD_PAYMENT
        );
    }
}
