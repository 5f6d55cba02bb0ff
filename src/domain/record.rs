//! Stored record types.

use std::fmt;

use crate::domain::fixed_point::ScaledDecimal;

/// Store-assigned identifier of a ticker row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickerId(pub i64);

impl fmt::Display for TickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One day of index data as written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub date: String,
    pub open: ScaledDecimal,
    pub high: ScaledDecimal,
    pub low: ScaledDecimal,
    pub close: ScaledDecimal,
    pub adj_close: ScaledDecimal,
    pub volume: i64,
    pub ticker_id: TickerId,
}

/// A stored record joined with its ticker symbol, as read back for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: String,
    pub open: ScaledDecimal,
    pub high: ScaledDecimal,
    pub low: ScaledDecimal,
    pub close: ScaledDecimal,
    pub adj_close: ScaledDecimal,
    pub volume: i64,
    pub symbol: String,
}

impl ExportRow {
    pub fn from_record(record: &IndexRecord, symbol: &str) -> Self {
        Self {
            date: record.date.clone(),
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            adj_close: record.adj_close,
            volume: record.volume,
            symbol: symbol.to_string(),
        }
    }
}
