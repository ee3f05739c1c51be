//! Read-through memoization for the data ports.
//!
//! Prices and fundamentals are cached separately: prices by
//! `(ticker, start, end)`, fundamentals by ticker. Only successful fetches
//! are stored and entries never expire.

use crate::domain::error::DashError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::price::PriceSeries;
use crate::ports::data_port::{FundamentalsPort, PricePort};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

type PriceKey = (String, NaiveDate, NaiveDate);

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct CachedPrices {
    inner: Arc<dyn PricePort + Send + Sync>,
    entries: Mutex<HashMap<PriceKey, PriceSeries>>,
}

impl CachedPrices {
    pub fn new(inner: Arc<dyn PricePort + Send + Sync>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PricePort for CachedPrices {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashError> {
        let key = (ticker.to_string(), start, end);
        if let Some(hit) = lock(&self.entries).get(&key) {
            debug!(%ticker, %start, %end, "price cache hit");
            return Ok(hit.clone());
        }

        let series = self.inner.fetch_prices(ticker, start, end)?;
        lock(&self.entries).insert(key, series.clone());
        Ok(series)
    }
}

pub struct CachedFundamentals {
    inner: Arc<dyn FundamentalsPort + Send + Sync>,
    entries: Mutex<HashMap<String, Fundamentals>>,
}

impl CachedFundamentals {
    pub fn new(inner: Arc<dyn FundamentalsPort + Send + Sync>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FundamentalsPort for CachedFundamentals {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, DashError> {
        if let Some(hit) = lock(&self.entries).get(ticker) {
            debug!(%ticker, "fundamentals cache hit");
            return Ok(hit.clone());
        }

        let fundamentals = self.inner.fetch_fundamentals(ticker)?;
        lock(&self.entries).insert(ticker.to_string(), fundamentals.clone());
        Ok(fundamentals)
    }
}
