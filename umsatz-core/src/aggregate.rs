//! Combining per-institution tables into one filtered, deduplicated view.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::transaction::{Institution, Transaction};

/// One institution's finalized table.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub institution: Institution,
    pub rows: Vec<Transaction>,
}

impl SourceTable {
    pub fn new(institution: Institution, rows: Vec<Transaction>) -> Self {
        Self { institution, rows }
    }
}

/// Row filter applied by [`combine`].
///
/// `institutions` is the selected subset (empty selects nothing);
/// `processes` of `None` keeps every process label. Date bounds are
/// inclusive.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub institutions: Vec<Institution>,
    pub processes: Option<Vec<String>>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Selection {
    /// Select everything from the given institutions.
    pub fn all_of(institutions: Vec<Institution>) -> Self {
        Self {
            institutions,
            ..Self::default()
        }
    }

    fn matches(&self, row: &Transaction) -> bool {
        if let Some(processes) = &self.processes {
            if !processes.iter().any(|p| p == &row.process) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if row.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if row.date > to {
                return false;
            }
        }
        true
    }
}

/// Merge the selected institution tables into one combined table.
///
/// Rows are filtered per `selection`, concatenated in the order the
/// institutions were selected, deduplicated, and date-sorted. An empty
/// selection yields an empty table, never an error. Identical inputs
/// always produce an identical table.
pub fn combine(tables: &[SourceTable], selection: &Selection) -> Vec<Transaction> {
    let mut rows: Vec<Transaction> = Vec::new();
    for institution in &selection.institutions {
        let Some(table) = tables.iter().find(|t| t.institution == *institution) else {
            continue;
        };
        rows.extend(table.rows.iter().filter(|r| selection.matches(r)).cloned());
    }
    finalize(rows)
}

/// Drop exact duplicates and stable-sort by date.
///
/// Shared by [`combine`] and by every per-institution `parse_all`: a
/// finalized table is date-ascending with a dense index and no two rows
/// agreeing on date, process, details, and amount.
pub fn finalize(mut rows: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen: HashSet<(NaiveDate, String, String, u64)> = HashSet::new();
    rows.retain(|r| {
        seen.insert((
            r.date,
            r.process.clone(),
            r.details.clone(),
            r.amount.to_bits(),
        ))
    });
    rows.sort_by_key(|r| r.date);
    debug!("finalized table with {} rows", rows.len());
    rows
}
