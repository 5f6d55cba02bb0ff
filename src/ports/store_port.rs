//! Record store port trait.

use crate::domain::error::EtlError;
use crate::domain::record::{ExportRow, IndexRecord, TickerId};

/// Relational storage for tickers and index records.
pub trait StorePort {
    /// Create the tickers and records tables if they do not exist.
    fn initialize_schema(&self) -> Result<(), EtlError>;

    /// Exact, case-sensitive symbol lookup.
    fn find_ticker(&self, symbol: &str) -> Result<Option<TickerId>, EtlError>;

    fn create_ticker(&self, symbol: &str) -> Result<TickerId, EtlError>;

    /// Insert a batch of records atomically.
    fn insert_records(&self, records: &[IndexRecord]) -> Result<(), EtlError>;

    /// All records joined with their ticker symbol, in insertion order.
    fn fetch_export_rows(&self) -> Result<Vec<ExportRow>, EtlError>;
}
