//! SQLite record store.

use crate::domain::error::EtlError;
use crate::domain::fixed_point::ScaledDecimal;
use crate::domain::record::{ExportRow, IndexRecord, TickerId};
use crate::ports::store_port::StorePort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};
use std::path::Path;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn query_error(e: rusqlite::Error) -> EtlError {
    EtlError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn enable_foreign_keys(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

impl SqliteAdapter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EtlError> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(enable_foreign_keys);
        Self::with_manager(manager)
    }

    /// Private in-memory database; the pool holds a single connection so
    /// every call sees the same data.
    pub fn in_memory() -> Result<Self, EtlError> {
        let manager = SqliteConnectionManager::memory().with_init(enable_foreign_keys);
        Self::with_manager(manager)
    }

    fn with_manager(manager: SqliteConnectionManager) -> Result<Self, EtlError> {
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| EtlError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, EtlError> {
        self.pool.get().map_err(|e: r2d2::Error| EtlError::Database {
            reason: e.to_string(),
        })
    }
}

impl StorePort for SqliteAdapter {
    fn initialize_schema(&self) -> Result<(), EtlError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tickers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS index_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                open INTEGER NOT NULL,
                open_precision INTEGER NOT NULL,
                high INTEGER NOT NULL,
                high_precision INTEGER NOT NULL,
                low INTEGER NOT NULL,
                low_precision INTEGER NOT NULL,
                close INTEGER NOT NULL,
                close_precision INTEGER NOT NULL,
                adj_close INTEGER NOT NULL,
                adj_close_precision INTEGER NOT NULL,
                volume INTEGER NOT NULL,
                ticker_id INTEGER NOT NULL REFERENCES tickers(id),
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_index_records_ticker ON index_records(ticker_id);",
        )
        .map_err(query_error)?;

        Ok(())
    }

    fn find_ticker(&self, symbol: &str) -> Result<Option<TickerId>, EtlError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id FROM tickers WHERE symbol = ?1",
            params![symbol],
            |row| row.get(0).map(TickerId),
        )
        .optional()
        .map_err(query_error)
    }

    fn create_ticker(&self, symbol: &str) -> Result<TickerId, EtlError> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO tickers (symbol) VALUES (?1)", params![symbol])
            .map_err(query_error)?;
        Ok(TickerId(conn.last_insert_rowid()))
    }

    fn insert_records(&self, records: &[IndexRecord]) -> Result<(), EtlError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_error)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO index_records (
                        date, open, open_precision, high, high_precision,
                        low, low_precision, close, close_precision,
                        adj_close, adj_close_precision, volume, ticker_id
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                )
                .map_err(query_error)?;

            for r in records {
                stmt.execute(params![
                    r.date,
                    r.open.magnitude,
                    r.open.places,
                    r.high.magnitude,
                    r.high.places,
                    r.low.magnitude,
                    r.low.places,
                    r.close.magnitude,
                    r.close.places,
                    r.adj_close.magnitude,
                    r.adj_close.places,
                    r.volume,
                    r.ticker_id.0
                ])
                .map_err(query_error)?;
            }
        }

        tx.commit().map_err(query_error)?;
        Ok(())
    }

    fn fetch_export_rows(&self) -> Result<Vec<ExportRow>, EtlError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT r.date, r.open, r.open_precision, r.high, r.high_precision,
                        r.low, r.low_precision, r.close, r.close_precision,
                        r.adj_close, r.adj_close_precision, r.volume, t.symbol
                 FROM index_records r
                 JOIN tickers t ON t.id = r.ticker_id
                 ORDER BY r.id ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map([], |row| {
                let scaled = |m: usize| -> rusqlite::Result<ScaledDecimal> {
                    Ok(ScaledDecimal::new(row.get(m)?, row.get(m + 1)?))
                };
                Ok(ExportRow {
                    date: row.get(0)?,
                    open: scaled(1)?,
                    high: scaled(3)?,
                    low: scaled(5)?,
                    close: scaled(7)?,
                    adj_close: scaled(9)?,
                    volume: row.get(11)?,
                    symbol: row.get(12)?,
                })
            })
            .map_err(query_error)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(query_error)?);
        }
        Ok(out)
    }
}
