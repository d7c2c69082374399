//! Income and spending totals per calendar month.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::transaction::Transaction;

/// Whether a monthly bucket aggregates inflows or outflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FlowKind {
    Income,
    Spending,
}

impl FlowKind {
    pub fn label(&self) -> &'static str {
        match self {
            FlowKind::Income => "Income",
            FlowKind::Spending => "Spending",
        }
    }
}

/// One (month, kind) total. Spending is reported as a positive magnitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    /// Calendar month key, `"YYYY-MM"`.
    pub month: String,
    pub kind: FlowKind,
    pub amount: f64,
}

/// Sum amounts per (calendar month, flow kind).
///
/// A row counts as income when its amount is non-negative, spending
/// otherwise. Months without transactions produce no row, and a month
/// with only one kind produces only that row. Output is sorted by month,
/// Income before Spending.
pub fn monthly_flows(rows: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut buckets: BTreeMap<(String, FlowKind), f64> = BTreeMap::new();
    for row in rows {
        let kind = if row.amount >= 0.0 {
            FlowKind::Income
        } else {
            FlowKind::Spending
        };
        let month = row.date.format("%Y-%m").to_string();
        *buckets.entry((month, kind)).or_insert(0.0) += row.amount;
    }
    buckets
        .into_iter()
        .map(|((month, kind), total)| MonthlyFlow {
            month,
            kind,
            // Sign-flip for display: spending magnitudes are positive.
            amount: if kind == FlowKind::Spending { -total } else { total },
        })
        .collect()
}
