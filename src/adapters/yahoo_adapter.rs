//! Yahoo Finance data adapter.
//!
//! Daily bars come from the v8 chart API and fundamentals from the v10
//! quoteSummary API. A single attempt is made per call; failures surface as
//! `DashError::Fetch` or `DashError::Parse` and the dashboard degrades that
//! section only.
//!
//! Bars are stamped at the exchange's session open in UTC; shifting by the
//! chart's `gmtoffset` gives the trading date.

use crate::domain::error::DashError;
use crate::domain::fundamentals::{Fundamentals, Metric, MetricValue};
use crate::domain::price::{check_ticker, PricePoint, PriceSeries};
use crate::ports::data_port::{FundamentalsPort, PricePort};
use chrono::{Days, NaiveDate};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stockdash";

const SUMMARY_MODULES: &str =
    "price,assetProfile,summaryProfile,financialData,summaryDetail,defaultKeyStatistics";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<HashMap<String, Value>>>,
    error: Option<ApiError>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl YahooAdapter {
    pub fn new(timeout: Duration) -> Result<Self, DashError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DashError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashError::fetch("*", format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| DashError::fetch("*", format!("invalid base URL {base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// `base_url` joined with `segments`; each segment is percent-encoded.
    fn endpoint(&self, ticker: &str, segments: &[&str]) -> Result<Url, DashError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::fetch(ticker, "base URL cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Padded by a day on both sides; `parse_chart` trims to the exchange date.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Url, DashError> {
        let unix = |d: NaiveDate| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period1 = unix(start.checked_sub_days(Days::new(1)).unwrap_or(start));
        let period2 = unix(end.checked_add_days(Days::new(1)).unwrap_or(end));

        let mut url = self.endpoint(ticker, &["v8", "finance", "chart", ticker])?;
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d");
        Ok(url)
    }

    fn summary_url(&self, ticker: &str) -> Result<Url, DashError> {
        let mut url = self.endpoint(ticker, &["v10", "finance", "quoteSummary", ticker])?;
        url.query_pairs_mut().append_pair("modules", SUMMARY_MODULES);
        Ok(url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, ticker: &str, url: Url) -> Result<T, DashError> {
        debug!(%ticker, %url, "requesting");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DashError::fetch(ticker, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashError::fetch(ticker, format!("HTTP {status}")));
        }

        resp.json()
            .map_err(|e| DashError::parse(ticker, format!("malformed response: {e}")))
    }
}

fn api_error(ticker: &str, err: Option<ApiError>, what: &str) -> DashError {
    match err {
        Some(e) => DashError::fetch(ticker, format!("{}: {}", e.code, e.description)),
        None => DashError::parse(ticker, format!("{what} missing from response")),
    }
}

/// Keeps rows dated in `[start, end)` that carry a close.
fn parse_chart(
    ticker: &str,
    resp: ChartResponse,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, DashError> {
    let data = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| api_error(ticker, resp.chart.error, "chart result"))?;

    let offset = data.meta.map_or(0, |m| m.gmtoffset);
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DashError::parse(ticker, "no quote data"))?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts.saturating_add(offset), 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DashError::parse(ticker, format!("invalid timestamp: {ts}")))?;
        if date < start || date >= end {
            continue;
        }

        // Non-trading rows come back with null prices.
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };

        points.push(PricePoint {
            date,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close,
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    if points.is_empty() {
        return Err(DashError::NoData {
            ticker: ticker.to_string(),
            start,
            end,
        });
    }
    Ok(PriceSeries::new(ticker, points))
}

/// Summary fields are either plain JSON values or `{"raw": .., "fmt": ..}`
/// objects; empty objects mean "not reported".
fn metric_value(value: &Value) -> Option<MetricValue> {
    match value {
        Value::String(s) => MetricValue::parse(s),
        Value::Number(n) => n.as_f64().map(MetricValue::Number),
        Value::Object(obj) => obj.get("raw").and_then(metric_value),
        _ => None,
    }
}

fn parse_summary(ticker: &str, resp: SummaryResponse) -> Result<Fundamentals, DashError> {
    let modules = resp
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| api_error(ticker, resp.quote_summary.error, "quote summary"))?;

    let mut values = HashMap::new();
    for metric in Metric::ALL {
        let found = modules
            .values()
            .filter_map(|module| module.get(metric.field()))
            .find_map(metric_value);
        if let Some(v) = found {
            values.insert(metric, v);
        }
    }
    Ok(Fundamentals::new(ticker, values))
}

impl PricePort for YahooAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashError> {
        check_ticker(ticker)?;
        let resp: ChartResponse = self.get_json(ticker, self.chart_url(ticker, start, end)?)?;
        let series = parse_chart(ticker, resp, start, end)?;
        info!(%ticker, rows = series.len(), "fetched prices");
        Ok(series)
    }
}

impl FundamentalsPort for YahooAdapter {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, DashError> {
        check_ticker(ticker)?;
        let resp: SummaryResponse = self.get_json(ticker, self.summary_url(ticker)?)?;
        let fundamentals = parse_summary(ticker, resp)?;
        info!(%ticker, "fetched fundamentals");
        Ok(fundamentals)
    }
}
