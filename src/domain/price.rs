//! Daily price observations for a single ticker.

use chrono::NaiveDate;

use crate::domain::error::DashError;

/// Accepts symbols built from `A-Z`, `0-9` and `.^=-`, e.g. `BHP.AX`,
/// `^GSPC`, `EURUSD=X`. Adapters call this before a ticker reaches a path
/// or URL.
pub fn check_ticker(ticker: &str) -> Result<(), DashError> {
    let allowed = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || ".^=-".contains(c);
    if ticker.is_empty() || ticker.contains("..") || !ticker.chars().all(allowed) {
        return Err(DashError::fetch(ticker, "invalid ticker symbol"));
    }
    Ok(())
}

/// One trading day. Only `close` feeds the indicator engine; the other
/// fields are carried for the preview table and may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PricePoint {
    /// A close-only observation.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

/// Date-ordered closes for one ticker over a requested range.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts by date and drops repeated dates, keeping the first occurrence.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// First `n` rows, or fewer when the series is shorter.
    pub fn head(&self, n: usize) -> &[PricePoint] {
        &self.points[..n.min(self.points.len())]
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
