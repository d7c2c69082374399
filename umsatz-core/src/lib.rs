//! umsatz-core: canonical transaction schema, locale parsing, aggregation.

pub mod aggregate;
pub mod locale;
pub mod monthly;
pub mod process;
pub mod transaction;

pub use aggregate::{Selection, SourceTable, combine, finalize};
pub use monthly::{FlowKind, MonthlyFlow, monthly_flows};
pub use process::{normalize_process, vocab};
pub use transaction::{Institution, Transaction};
