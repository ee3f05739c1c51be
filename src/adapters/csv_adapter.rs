//! CSV file data adapter.
//!
//! Layout under `base_path`:
//! - `{TICKER}.csv`: header row naming at least `date` and `close`; `open`,
//!   `high`, `low` and `volume` are picked up when present.
//! - `{TICKER}_fundamentals.csv`: `metric,value` rows, metric given by
//!   display label or provider field name.

use crate::domain::error::DashError;
use crate::domain::fundamentals::{Fundamentals, Metric, MetricValue};
use crate::domain::price::{check_ticker, PricePoint, PriceSeries};
use crate::ports::data_port::{FundamentalsPort, PricePort};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(ticker: &str, headers: &csv::StringRecord) -> Result<Self, DashError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            date: find("date").ok_or_else(|| DashError::parse(ticker, "missing date column"))?,
            close: find("close").ok_or_else(|| DashError::parse(ticker, "missing close column"))?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn prices_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn fundamentals_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}_fundamentals.csv", ticker))
    }

    /// The path stays in the log; the error names only the file.
    fn read(&self, ticker: &str, path: &Path) -> Result<String, DashError> {
        fs::read_to_string(path).map_err(|e| {
            warn!(%ticker, path = %path.display(), error = %e, "csv read failed");
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            DashError::fetch(ticker, format!("no data file {file}: {}", e.kind()))
        })
    }
}

fn optional_f64(
    ticker: &str,
    record: &csv::StringRecord,
    idx: Option<usize>,
    name: &str,
) -> Result<Option<f64>, DashError> {
    match idx.and_then(|i| record.get(i)).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| DashError::parse(ticker, format!("invalid {} value: {}", name, e))),
    }
}

impl PricePort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashError> {
        check_ticker(ticker)?;
        let path = self.prices_path(ticker);
        let content = self.read(ticker, &path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| DashError::parse(ticker, format!("CSV header error: {}", e)))?
            .clone();
        let cols = Columns::from_headers(ticker, &headers)?;
        let mut points = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| DashError::parse(ticker, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(cols.date)
                .ok_or_else(|| DashError::parse(ticker, "missing date value"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| DashError::parse(ticker, format!("invalid date format: {}", e)))?;

            if date < start || date >= end {
                continue;
            }

            let close = optional_f64(ticker, &record, Some(cols.close), "close")?
                .ok_or_else(|| DashError::parse(ticker, format!("missing close on {}", date)))?;

            let volume = optional_f64(ticker, &record, cols.volume, "volume")?
                .map(|v| v.max(0.0) as u64);

            points.push(PricePoint {
                date,
                open: optional_f64(ticker, &record, cols.open, "open")?,
                high: optional_f64(ticker, &record, cols.high, "high")?,
                low: optional_f64(ticker, &record, cols.low, "low")?,
                close,
                volume,
            });
        }

        if points.is_empty() {
            warn!(%ticker, path = %path.display(), "no rows in range");
            return Err(DashError::NoData {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }

        debug!(%ticker, rows = points.len(), "loaded prices from csv");
        Ok(PriceSeries::new(ticker, points))
    }
}

impl FundamentalsPort for CsvAdapter {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, DashError> {
        check_ticker(ticker)?;
        let path = self.fundamentals_path(ticker);
        let content = self.read(ticker, &path)?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut values = HashMap::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| DashError::parse(ticker, format!("CSV parse error: {}", e)))?;
            let name = record.get(0).unwrap_or_default();
            let Some(metric) = Metric::parse(name) else {
                debug!(%ticker, metric = name, "ignoring unknown metric");
                continue;
            };
            if let Some(value) = record.get(1).and_then(MetricValue::parse) {
                values.insert(metric, value);
            }
        }

        Ok(Fundamentals::new(ticker, values))
    }
}
