//! Ticker symbol to store id resolution with a per-run cache.

use std::collections::HashMap;

use crate::domain::error::EtlError;
use crate::domain::record::TickerId;
use crate::ports::store_port::StorePort;

/// Maps symbols to ticker ids, creating tickers on first sight.
///
/// The cache lives as long as the resolver, which the import pipeline owns
/// for exactly one run.
#[derive(Debug, Default)]
pub struct TickerResolver {
    cache: HashMap<String, TickerId>,
    created: usize,
}

impl TickerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, store: &dyn StorePort, symbol: &str) -> Result<TickerId, EtlError> {
        if let Some(&id) = self.cache.get(symbol) {
            return Ok(id);
        }

        let id = match store.find_ticker(symbol)? {
            Some(id) => id,
            None => {
                let id = store.create_ticker(symbol)?;
                self.created += 1;
                tracing::debug!(symbol, id = id.0, "created ticker");
                id
            }
        };

        self.cache.insert(symbol.to_string(), id);
        Ok(id)
    }

    /// Number of distinct symbols resolved so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of tickers this resolver had to create.
    pub fn created(&self) -> usize {
        self.created
    }
}
