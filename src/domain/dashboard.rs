//! The per-request dashboard pipeline.
//!
//! `render` is called once per user interaction with the ticker and date
//! range. It never fails: validation problems and fetch failures are recorded
//! on the section they affect, and every other section still renders.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::error::DashError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::indicator::{IndicatorConfig, IndicatorSeries};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::price::PriceSeries;
use crate::domain::sentiment::{analyze_headlines, SentimentReport};
use crate::domain::trend::Trend;
use crate::ports::data_port::{FundamentalsPort, PricePort};
use crate::ports::sentiment_port::SentimentPort;

pub const NO_DATA_WARNING: &str =
    "No data available. Please adjust the date range or check the ticker symbol.";
pub const ENTER_TICKER_PROMPT: &str =
    "Please enter the ticker symbol, start date, and end date to begin the analysis.";

/// Date range offered when the user has not picked one.
pub const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(d) => d,
    None => NaiveDate::MIN,
};
pub const DEFAULT_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(d) => d,
    None => NaiveDate::MAX,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DashboardRequest {
    /// Trims and upper-cases the ticker. The symbol is not checked against
    /// any list; unknown tickers surface as fetch failures.
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            start,
            end,
        }
    }

    pub fn has_ticker(&self) -> bool {
        !self.ticker.is_empty()
    }

    pub fn validate_range(&self) -> Result<(), DashError> {
        if self.start >= self.end {
            return Err(DashError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub indicators: IndicatorConfig,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            preview_rows: 5,
        }
    }
}

/// Outcome of one independently rendered section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Ready(T),
    /// The section ran and its collaborator failed.
    Failed(String),
    /// The section was withheld before running.
    Skipped(String),
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Section::Ready(_) => None,
            Section::Failed(m) | Section::Skipped(m) => Some(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceAnalysis {
    pub series: PriceSeries,
    pub indicators: IndicatorSeries,
    pub trend: Option<Trend>,
}

impl PriceAnalysis {
    /// True when the long SMA never became defined, so the trend reading
    /// compares against nothing.
    pub fn insufficient_history(&self) -> bool {
        self.indicators
            .last()
            .is_none_or(|row| row.sma_short.is_none() || row.sma_long.is_none())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub request: DashboardRequest,
    pub validation_error: Option<String>,
    pub sentiment: Section<SentimentReport>,
    pub fundamentals: Section<Fundamentals>,
    pub prices: Section<PriceAnalysis>,
}

/// Collaborators injected into the pipeline.
pub struct DashboardPorts<'a> {
    pub prices: &'a dyn PricePort,
    pub fundamentals: &'a dyn FundamentalsPort,
    pub sentiment: &'a dyn SentimentPort,
}

pub fn render(
    ports: &DashboardPorts<'_>,
    request: &DashboardRequest,
    config: &DashboardConfig,
) -> Dashboard {
    if !request.has_ticker() {
        return Dashboard {
            request: request.clone(),
            validation_error: None,
            sentiment: Section::Skipped(ENTER_TICKER_PROMPT.to_string()),
            fundamentals: Section::Skipped(ENTER_TICKER_PROMPT.to_string()),
            prices: Section::Skipped(ENTER_TICKER_PROMPT.to_string()),
        };
    }

    let validation_error = request.validate_range().err().map(|e| {
        warn!(ticker = %request.ticker, error = %e, "rejected date range");
        "Start Date must be earlier than End Date.".to_string()
    });

    let sentiment = Section::Ready(analyze_headlines(ports.sentiment, &request.ticker));
    let fundamentals = fundamentals_section(ports.fundamentals, &request.ticker);

    let prices = match &validation_error {
        Some(msg) => Section::Skipped(msg.clone()),
        None => price_section(ports.prices, request, &config.indicators),
    };

    Dashboard {
        request: request.clone(),
        validation_error,
        sentiment,
        fundamentals,
        prices,
    }
}

fn fundamentals_section(port: &dyn FundamentalsPort, ticker: &str) -> Section<Fundamentals> {
    match port.fetch_fundamentals(ticker) {
        Ok(f) => Section::Ready(f),
        Err(e) => {
            warn!(%ticker, error = %e, "fundamentals unavailable");
            Section::Failed(format!("Error loading fundamentals: {e}"))
        }
    }
}

fn price_section(
    port: &dyn PricePort,
    request: &DashboardRequest,
    config: &IndicatorConfig,
) -> Section<PriceAnalysis> {
    let series = match port.fetch_prices(&request.ticker, request.start, request.end) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            warn!(ticker = %request.ticker, "price fetch returned no rows");
            return Section::Failed(NO_DATA_WARNING.to_string());
        }
        Err(e) => {
            warn!(ticker = %request.ticker, error = %e, "price fetch failed");
            return Section::Failed(format!("{NO_DATA_WARNING} ({e})"));
        }
    };

    let indicators = compute_indicators(&series, config);
    let trend = Trend::from_series(&indicators);
    info!(
        ticker = %request.ticker,
        rows = series.len(),
        trend = trend.map(Trend::label).unwrap_or("none"),
        "computed indicators"
    );

    Section::Ready(PriceAnalysis {
        series,
        indicators,
        trend,
    })
}
