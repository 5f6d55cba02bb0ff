//! Export row shaping shared by the spreadsheet and document writers.

use std::str::FromStr;

use crate::domain::record::ExportRow;

pub const EXPORT_HEADERS: [&str; 13] = [
    "Date",
    "Open",
    "Open Precision",
    "High",
    "High Precision",
    "Low",
    "Low Precision",
    "Close",
    "Close Precision",
    "Adj_Close",
    "AdjClose Precision",
    "Volume",
    "Ticker",
];

/// A single output cell. Scaled values stay integers all the way to the
/// file; they are never turned back into decimals here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportCell {
    Text(String),
    Integer(i64),
}

impl ExportCell {
    pub fn render(&self) -> String {
        match self {
            ExportCell::Text(s) => s.clone(),
            ExportCell::Integer(n) => n.to_string(),
        }
    }
}

/// Row order for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportOrder {
    /// The order the store returns, which is insertion order.
    #[default]
    Store,
    /// Sorted by date text, then symbol.
    DateSymbol,
}

impl FromStr for ExportOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "store" | "insertion" => Ok(ExportOrder::Store),
            "date" => Ok(ExportOrder::DateSymbol),
            other => Err(format!("unknown export order '{other}' (expected store or date)")),
        }
    }
}

pub fn order_rows(rows: &mut [ExportRow], order: ExportOrder) {
    if order == ExportOrder::DateSymbol {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));
    }
}

pub fn export_cells(row: &ExportRow) -> [ExportCell; 13] {
    [
        ExportCell::Text(row.date.clone()),
        ExportCell::Integer(row.open.magnitude),
        ExportCell::Integer(row.open.places.into()),
        ExportCell::Integer(row.high.magnitude),
        ExportCell::Integer(row.high.places.into()),
        ExportCell::Integer(row.low.magnitude),
        ExportCell::Integer(row.low.places.into()),
        ExportCell::Integer(row.close.magnitude),
        ExportCell::Integer(row.close.places.into()),
        ExportCell::Integer(row.adj_close.magnitude),
        ExportCell::Integer(row.adj_close.places.into()),
        ExportCell::Integer(row.volume),
        ExportCell::Text(row.symbol.clone()),
    ]
}
