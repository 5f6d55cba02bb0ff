//! Row-to-record import with batched store writes.

use crate::domain::error::EtlError;
use crate::domain::fixed_point::{self, ScaledDecimal};
use crate::domain::record::IndexRecord;
use crate::domain::resolver::TickerResolver;
use crate::ports::store_port::StorePort;

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Columns expected in every import row, in order:
/// date, open, high, low, close, adj_close, volume, symbol.
pub const IMPORT_COLUMNS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub records_inserted: usize,
    pub batches_flushed: usize,
    pub tickers_resolved: usize,
    pub tickers_created: usize,
    pub conversion_failures: usize,
    pub volume_defaults: usize,
}

/// Import rows into `store`, flushing every `batch_size` records and once
/// more at the end. Store failures abort the run; records buffered but not
/// yet flushed at that point are dropped.
pub fn import_rows<I>(
    store: &dyn StorePort,
    rows: I,
    batch_size: usize,
) -> Result<ImportSummary, EtlError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let batch_size = batch_size.max(1);
    let mut resolver = TickerResolver::new();
    let mut summary = ImportSummary::default();
    let mut buffer: Vec<IndexRecord> = Vec::with_capacity(batch_size);

    for (index, row) in rows.into_iter().enumerate() {
        summary.rows_read += 1;
        // +2: one for the skipped header, one for 1-based numbering
        let line = index + 2;

        if row.iter().all(|cell| cell.trim().is_empty()) {
            summary.rows_skipped += 1;
            continue;
        }
        if row.len() < IMPORT_COLUMNS {
            tracing::warn!(line, columns = row.len(), "short row skipped");
            summary.rows_skipped += 1;
            continue;
        }

        let ticker_id = resolver.resolve(store, &row[7])?;

        let _row = tracing::warn_span!("row", line).entered();
        let mut decimal = |text: &str| -> ScaledDecimal {
            match fixed_point::convert(text) {
                Ok(value) => value,
                Err(_) => {
                    summary.conversion_failures += 1;
                    fixed_point::convert_or_zero(text)
                }
            }
        };
        let open = decimal(&row[1]);
        let high = decimal(&row[2]);
        let low = decimal(&row[3]);
        let close = decimal(&row[4]);
        let adj_close = decimal(&row[5]);

        let volume = match parse_volume(&row[6]) {
            Some(v) => v,
            None => {
                tracing::warn!(line, input = row[6].as_str(), "volume not an integer, using 0");
                summary.volume_defaults += 1;
                0
            }
        };

        buffer.push(IndexRecord {
            date: row[0].clone(),
            open,
            high,
            low,
            close,
            adj_close,
            volume,
            ticker_id,
        });

        if buffer.len() >= batch_size {
            flush(store, &mut buffer, &mut summary)?;
        }
    }

    if !buffer.is_empty() {
        flush(store, &mut buffer, &mut summary)?;
    }

    summary.tickers_resolved = resolver.cached_len();
    summary.tickers_created = resolver.created();
    Ok(summary)
}

/// Plain signed integer parse. `None` marks a value that will be stored as
/// 0, so callers can tell it apart from a real zero volume.
pub fn parse_volume(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

fn flush(
    store: &dyn StorePort,
    buffer: &mut Vec<IndexRecord>,
    summary: &mut ImportSummary,
) -> Result<(), EtlError> {
    store.insert_records(buffer)?;
    summary.records_inserted += buffer.len();
    summary.batches_flushed += 1;
    tracing::debug!(records = buffer.len(), total = summary.records_inserted, "batch flushed");
    buffer.clear();
    Ok(())
}
