#![allow(dead_code)]

use indexetl::domain::error::EtlError;
use indexetl::domain::record::{ExportRow, IndexRecord, TickerId};
use indexetl::ports::store_port::StorePort;
use std::cell::{Cell, RefCell};

/// In-memory store that records every call it receives.
pub struct MockStore {
    pub tickers: RefCell<Vec<String>>,
    pub records: RefCell<Vec<IndexRecord>>,
    pub batch_sizes: RefCell<Vec<usize>>,
    pub lookups: Cell<usize>,
    /// Fail the insert call with this 1-based index.
    pub fail_on_batch: Option<usize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            tickers: RefCell::new(Vec::new()),
            records: RefCell::new(Vec::new()),
            batch_sizes: RefCell::new(Vec::new()),
            lookups: Cell::new(0),
            fail_on_batch: None,
        }
    }

    pub fn failing_on_batch(mut self, batch: usize) -> Self {
        self.fail_on_batch = Some(batch);
        self
    }

    pub fn with_ticker(self, symbol: &str) -> Self {
        self.tickers.borrow_mut().push(symbol.to_string());
        self
    }

    pub fn symbol_of(&self, id: TickerId) -> String {
        self.tickers.borrow()[(id.0 - 1) as usize].clone()
    }
}

impl StorePort for MockStore {
    fn initialize_schema(&self) -> Result<(), EtlError> {
        Ok(())
    }

    fn find_ticker(&self, symbol: &str) -> Result<Option<TickerId>, EtlError> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self
            .tickers
            .borrow()
            .iter()
            .position(|s| s == symbol)
            .map(|i| TickerId(i as i64 + 1)))
    }

    fn create_ticker(&self, symbol: &str) -> Result<TickerId, EtlError> {
        let mut tickers = self.tickers.borrow_mut();
        tickers.push(symbol.to_string());
        Ok(TickerId(tickers.len() as i64))
    }

    fn insert_records(&self, records: &[IndexRecord]) -> Result<(), EtlError> {
        let mut sizes = self.batch_sizes.borrow_mut();
        sizes.push(records.len());
        if Some(sizes.len()) == self.fail_on_batch {
            return Err(EtlError::DatabaseQuery {
                reason: "insert rejected".into(),
            });
        }
        self.records.borrow_mut().extend_from_slice(records);
        Ok(())
    }

    fn fetch_export_rows(&self) -> Result<Vec<ExportRow>, EtlError> {
        Ok(self
            .records
            .borrow()
            .iter()
            .map(|r| ExportRow::from_record(r, &self.symbol_of(r.ticker_id)))
            .collect())
    }
}

/// A well-formed import row.
pub fn make_row(date: &str, close: &str, volume: &str, symbol: &str) -> Vec<String> {
    vec![
        date.to_string(),
        close.to_string(),
        close.to_string(),
        close.to_string(),
        close.to_string(),
        close.to_string(),
        volume.to_string(),
        symbol.to_string(),
    ]
}

/// `count` consecutive daily rows for one symbol.
pub fn generate_rows(symbol: &str, count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            make_row(
                &format!("2024-{:02}-{:02}", i / 28 % 12 + 1, i % 28 + 1),
                &format!("{}.{:02}", 4700 + i, i % 100),
                &(1_000_000 + i).to_string(),
                symbol,
            )
        })
        .collect()
}
