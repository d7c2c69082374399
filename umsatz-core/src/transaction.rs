use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Statement-issuing institution.
///
/// Parsers are selected by this tag explicitly; export formats are irregular
/// enough that format sniffing would be guesswork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    Comdirect,
    TradeRepublic,
    Olb,
}

impl Institution {
    pub fn label(&self) -> &'static str {
        match self {
            Institution::Comdirect => "comdirect",
            Institution::TradeRepublic => "Trade Republic",
            Institution::Olb => "OLB",
        }
    }
}

/// Normalized output of statement parsers (institution-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Booking date, no time component.
    pub date: NaiveDate,
    /// Shared-vocabulary process label, or the native label verbatim when
    /// the normalization table does not know it.
    pub process: String,
    /// Merchant/counterparty description. Shortened for institutions that
    /// truncate; the full text then lives in `long_details`.
    pub details: String,
    /// Untruncated original description, only present when `details` was cut.
    pub long_details: Option<String>,
    /// Signed amount. Negative means outflow.
    pub amount: f64,
    /// Finer-granularity timestamp when the source exposes one.
    pub datetime: Option<NaiveDateTime>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        process: impl Into<String>,
        details: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date,
            process: process.into(),
            details: details.into(),
            long_details: None,
            amount,
            datetime: None,
        }
    }

    /// Day of week, Monday = 0.
    pub fn weekday(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    /// Day of month, 1-based.
    pub fn monthday(&self) -> u32 {
        self.date.day()
    }

    /// Returns true if this is an outflow (negative amount).
    pub fn is_spending(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is an inflow (non-negative amount).
    pub fn is_income(&self) -> bool {
        self.amount >= 0.0
    }

    /// Get the absolute amount.
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}
