//! umsatz-ingest: statement ingestion (CSV/PDF text) and bank-specific parsers.

pub mod discover;
pub mod parsers;

pub use discover::find_export_files;
pub use parsers::parse_all;
