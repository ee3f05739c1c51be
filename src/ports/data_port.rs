//! Market-data access ports.
//!
//! Prices and fundamentals are independent capabilities: a failing
//! fundamentals lookup must never block the price pipeline.

use crate::domain::error::DashError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PricePort {
    /// Daily closes for `ticker` over `[start, end)`. Unknown tickers and
    /// empty ranges are errors, never an empty series.
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashError>;
}

pub trait FundamentalsPort {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, DashError>;
}
