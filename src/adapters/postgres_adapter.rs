//! PostgreSQL record store.

use crate::domain::error::EtlError;
use crate::domain::fixed_point::ScaledDecimal;
use crate::domain::record::{ExportRow, IndexRecord, TickerId};
use crate::domain::settings::PostgresConfig;
use crate::ports::store_port::StorePort;
use postgres::{Client, NoTls, Row};
use std::cell::RefCell;

pub struct PostgresAdapter {
    client: RefCell<Client>,
}

fn query_error(e: postgres::Error) -> EtlError {
    EtlError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl PostgresAdapter {
    pub fn connect(config: &PostgresConfig) -> Result<Self, EtlError> {
        let client = Client::connect(&config.connection_string(), NoTls).map_err(|e| {
            EtlError::Database {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }
}

fn scaled(row: &Row, idx: usize) -> ScaledDecimal {
    let places: i32 = row.get(idx + 1);
    ScaledDecimal::new(row.get(idx), places.max(0) as u32)
}

impl StorePort for PostgresAdapter {
    fn initialize_schema(&self) -> Result<(), EtlError> {
        self.client
            .borrow_mut()
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS tickers (
                    id BIGSERIAL PRIMARY KEY,
                    symbol TEXT NOT NULL UNIQUE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                CREATE TABLE IF NOT EXISTS index_records (
                    id BIGSERIAL PRIMARY KEY,
                    date TEXT NOT NULL,
                    open BIGINT NOT NULL,
                    open_precision INTEGER NOT NULL,
                    high BIGINT NOT NULL,
                    high_precision INTEGER NOT NULL,
                    low BIGINT NOT NULL,
                    low_precision INTEGER NOT NULL,
                    close BIGINT NOT NULL,
                    close_precision INTEGER NOT NULL,
                    adj_close BIGINT NOT NULL,
                    adj_close_precision INTEGER NOT NULL,
                    volume BIGINT NOT NULL,
                    ticker_id BIGINT NOT NULL REFERENCES tickers(id),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                CREATE INDEX IF NOT EXISTS idx_index_records_ticker ON index_records(ticker_id);",
            )
            .map_err(query_error)
    }

    fn find_ticker(&self, symbol: &str) -> Result<Option<TickerId>, EtlError> {
        let row = self
            .client
            .borrow_mut()
            .query_opt("SELECT id FROM tickers WHERE symbol = $1", &[&symbol])
            .map_err(query_error)?;

        Ok(row.map(|r| TickerId(r.get(0))))
    }

    fn create_ticker(&self, symbol: &str) -> Result<TickerId, EtlError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                "INSERT INTO tickers (symbol) VALUES ($1) RETURNING id",
                &[&symbol],
            )
            .map_err(query_error)?;

        Ok(TickerId(row.get(0)))
    }

    fn insert_records(&self, records: &[IndexRecord]) -> Result<(), EtlError> {
        let mut client = self.client.borrow_mut();
        let mut tx = client.transaction().map_err(query_error)?;

        let stmt = tx
            .prepare(
                "INSERT INTO index_records (
                    date, open, open_precision, high, high_precision,
                    low, low_precision, close, close_precision,
                    adj_close, adj_close_precision, volume, ticker_id
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            )
            .map_err(query_error)?;

        for r in records {
            let places = [
                r.open.places as i32,
                r.high.places as i32,
                r.low.places as i32,
                r.close.places as i32,
                r.adj_close.places as i32,
            ];
            tx.execute(
                &stmt,
                &[
                    &r.date,
                    &r.open.magnitude,
                    &places[0],
                    &r.high.magnitude,
                    &places[1],
                    &r.low.magnitude,
                    &places[2],
                    &r.close.magnitude,
                    &places[3],
                    &r.adj_close.magnitude,
                    &places[4],
                    &r.volume,
                    &r.ticker_id.0,
                ],
            )
            .map_err(query_error)?;
        }

        tx.commit().map_err(query_error)
    }

    fn fetch_export_rows(&self) -> Result<Vec<ExportRow>, EtlError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT r.date, r.open, r.open_precision, r.high, r.high_precision, \
                        r.low, r.low_precision, r.close, r.close_precision, \
                        r.adj_close, r.adj_close_precision, r.volume, t.symbol \
                 FROM index_records r \
                 JOIN tickers t ON t.id = r.ticker_id \
                 ORDER BY r.id ASC",
                &[],
            )
            .map_err(query_error)?;

        Ok(rows
            .iter()
            .map(|row| ExportRow {
                date: row.get(0),
                open: scaled(row, 1),
                high: scaled(row, 3),
                low: scaled(row, 5),
                close: scaled(row, 7),
                adj_close: scaled(row, 9),
                volume: row.get(11),
                symbol: row.get(12),
            })
            .collect())
    }
}
