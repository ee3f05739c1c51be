#![allow(dead_code)]

use chrono::NaiveDate;
use stockdash::domain::error::DashError;
use stockdash::domain::fundamentals::{Fundamentals, Metric, MetricValue};
pub use stockdash::domain::price::{PricePoint, PriceSeries};
use stockdash::domain::sentiment::Sentiment;
use stockdash::ports::data_port::{FundamentalsPort, PricePort};
use stockdash::ports::sentiment_port::SentimentPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory price source. Rows outside `[start, end)` are filtered the way
/// real adapters do; an empty result is `NoData`.
#[derive(Default)]
pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PricePort for MockPriceSource {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DashError::fetch(ticker, reason.clone()));
        }
        let points: Vec<PricePoint> = self
            .data
            .get(ticker)
            .map(|pts| {
                pts.iter()
                    .filter(|p| p.date >= start && p.date < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if points.is_empty() {
            return Err(DashError::NoData {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(PriceSeries::new(ticker, points))
    }
}

#[derive(Default)]
pub struct MockFundamentals {
    pub data: HashMap<String, HashMap<Metric, MetricValue>>,
    pub calls: AtomicUsize,
}

impl MockFundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, ticker: &str, values: Vec<(Metric, MetricValue)>) -> Self {
        self.data
            .insert(ticker.to_string(), values.into_iter().collect());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FundamentalsPort for MockFundamentals {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, DashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.data.get(ticker) {
            Some(values) => Ok(Fundamentals::new(ticker, values.clone())),
            None => Err(DashError::fetch(ticker, "quote summary unavailable")),
        }
    }
}

/// Scores headlines by the first keyword they contain.
pub struct KeywordSentiment;

impl SentimentPort for KeywordSentiment {
    fn score(&self, text: &str) -> Sentiment {
        let polarity = [
            ("impressive", 0.5),
            ("disappointing", -0.2),
            ("launch", 0.3),
            ("regulatory", -0.1),
        ]
        .iter()
        .find(|(word, _)| text.contains(word))
        .map(|(_, p)| *p)
        .unwrap_or(0.0);
        Sentiment {
            polarity,
            subjectivity: 0.5,
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive daily closes starting at `start`.
pub fn daily_points(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
        .collect()
}

/// `n` closes rising by `step` from `base`.
pub fn trending_closes(n: usize, base: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| base + step * i as f64).collect()
}

pub fn acme_fundamentals() -> MockFundamentals {
    MockFundamentals::new().with_values(
        "ACME",
        vec![
            (Metric::CompanyName, MetricValue::Text("Acme Corp".into())),
            (Metric::Sector, MetricValue::Text("Industrials".into())),
            (Metric::TrailingPe, MetricValue::Number(18.5)),
        ],
    )
}

/// Writes `{ticker}.csv` with a full OHLCV header into `dir`.
pub fn write_price_csv(dir: &std::path::Path, ticker: &str, start: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for p in daily_points(start, closes) {
        content.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{:.2},{}\n",
            p.date,
            p.close - 0.5,
            p.close + 1.0,
            p.close - 1.0,
            p.close,
            100_000
        ));
    }
    std::fs::write(dir.join(format!("{ticker}.csv")), content).unwrap();
}
