//! Integration tests for the dashboard pipeline.
//!
//! Tests cover:
//! - Full render with mock ports (sentiment, fundamentals, prices, trend)
//! - Degraded sections: unknown ticker, failed fundamentals, bad date range
//! - Warm-up behaviour of the indicator columns on short histories
//! - Memoized fetchers shared across renders
//! - CSV adapter feeding the pipeline end to end
//! - Tickers that would escape the data directory degrade their sections

mod common;

use approx::assert_relative_eq;
use common::*;
use std::sync::Arc;
use stockdash::adapters::cache::{CachedFundamentals, CachedPrices};
use stockdash::adapters::csv_adapter::CsvAdapter;
use stockdash::adapters::lexicon_sentiment::LexiconSentiment;
use stockdash::domain::dashboard::{
    render, Dashboard, DashboardConfig, DashboardPorts, DashboardRequest, Section,
    ENTER_TICKER_PROMPT, NO_DATA_WARNING,
};
use stockdash::domain::fundamentals::{Metric, MetricValue};
use stockdash::domain::sentiment::SentimentLabel;
use stockdash::domain::trend::Trend;
use stockdash::ports::data_port::{FundamentalsPort, PricePort};
use stockdash::ports::sentiment_port::SentimentPort;

fn run(
    prices: &dyn PricePort,
    fundamentals: &dyn FundamentalsPort,
    sentiment: &dyn SentimentPort,
    ticker: &str,
    start: &str,
    end: &str,
) -> Dashboard {
    let ports = DashboardPorts {
        prices,
        fundamentals,
        sentiment,
    };
    let request = DashboardRequest::new(ticker, date(start), date(end));
    render(&ports, &request, &DashboardConfig::default())
}

mod full_pipeline {
    use super::*;

    #[test]
    fn rising_series_renders_every_section_bullish() {
        let prices = MockPriceSource::new()
            .with_points("ACME", daily_points("2023-01-01", &trending_closes(250, 100.0, 0.5)));
        let fundamentals = acme_fundamentals();

        let dashboard = run(&prices, &fundamentals, &KeywordSentiment, " acme ", "2023-01-01", "2024-01-01");

        assert_eq!(dashboard.request.ticker, "ACME");
        assert!(dashboard.validation_error.is_none());

        let report = dashboard.sentiment.ready().unwrap();
        assert_eq!(report.headlines.len(), 4);
        assert_relative_eq!(report.summary.mean_polarity, 0.125, epsilon = 1e-12);
        assert_eq!(report.summary.label, SentimentLabel::Positive);

        let f = dashboard.fundamentals.ready().unwrap();
        assert_eq!(f.get(Metric::CompanyName), Some(&MetricValue::Text("Acme Corp".into())));
        assert_eq!(f.get(Metric::Revenue), None);

        let analysis = dashboard.prices.ready().unwrap();
        assert_eq!(analysis.series.len(), 250);
        assert_eq!(analysis.indicators.len(), 250);
        assert_eq!(analysis.trend, Some(Trend::Bullish));
        assert!(!analysis.insufficient_history());

        let last = analysis.indicators.last().unwrap();
        assert!(last.sma_short.unwrap() > last.sma_long.unwrap());
        assert_relative_eq!(last.rsi.unwrap(), 100.0);
        assert_relative_eq!(last.stop_loss.unwrap(), 100.0 + 0.5 * 236.0);
    }

    #[test]
    fn falling_series_is_bearish() {
        let prices = MockPriceSource::new()
            .with_points("ACME", daily_points("2023-01-01", &trending_closes(220, 300.0, -1.0)));
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2023-01-01", "2024-01-01");

        let analysis = dashboard.prices.ready().unwrap();
        assert_eq!(analysis.trend, Some(Trend::Bearish));
        assert_relative_eq!(analysis.indicators.last().unwrap().rsi.unwrap(), 0.0);
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let mut closes = trending_closes(260, 50.0, 0.3);
        for (i, c) in closes.iter_mut().enumerate() {
            *c += ((i * 7) % 11) as f64 - 5.0;
        }
        let prices = MockPriceSource::new().with_points("ACME", daily_points("2023-01-01", &closes));

        let a = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2023-01-01", "2024-06-01");
        let b = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2023-01-01", "2024-06-01");

        let (a, b) = (a.prices.ready().unwrap(), b.prices.ready().unwrap());
        assert!(a.indicators.bit_identical(&b.indicators));
    }

    #[test]
    fn lexicon_scorer_runs_through_pipeline() {
        let prices = MockPriceSource::new().with_points("ACME", daily_points("2023-01-01", &[1.0, 2.0]));
        let dashboard = run(&prices, &acme_fundamentals(), &LexiconSentiment::new(), "ACME", "2023-01-01", "2024-01-01");

        let report = dashboard.sentiment.ready().unwrap();
        assert!(report.headlines.iter().all(|h| (-1.0..=1.0).contains(&h.polarity)));
        assert!(report.headlines[0].headline.starts_with("ACME "));
    }
}

mod warm_up {
    use super::*;

    #[test]
    fn thirteen_rising_points_leave_smas_undefined() {
        let prices = MockPriceSource::new()
            .with_points("ACME", daily_points("2024-01-01", &trending_closes(13, 10.0, 1.0)));
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2024-01-01", "2024-02-01");

        let analysis = dashboard.prices.ready().unwrap();
        assert!(analysis.indicators.rows.iter().all(|r| r.sma_short.is_none() && r.sma_long.is_none()));
        assert!(analysis.indicators.rows.iter().all(|r| r.rsi.is_none() && r.stop_loss.is_none()));
        assert_eq!(analysis.trend, Some(Trend::Converging));
        assert!(analysis.insufficient_history());
    }

    #[test]
    fn first_rsi_and_stop_loss_positions() {
        let prices = MockPriceSource::new()
            .with_points("ACME", daily_points("2024-01-01", &trending_closes(20, 10.0, 1.0)));
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2024-01-01", "2024-03-01");

        let rows = &dashboard.prices.ready().unwrap().indicators.rows;
        assert!(rows[13].rsi.is_none());
        assert!(rows[14].rsi.is_some());
        assert!(rows[12].stop_loss.is_none());
        assert_relative_eq!(rows[13].stop_loss.unwrap(), 10.0);
        assert_relative_eq!(rows[19].stop_loss.unwrap(), 16.0);
    }
}

mod degraded_sections {
    use super::*;

    #[test]
    fn unknown_ticker_fails_prices_and_fundamentals_only() {
        let prices = MockPriceSource::new().with_error("ZZZZ", "symbol may be delisted");
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "zzzz", "2023-01-01", "2024-01-01");

        assert!(dashboard.sentiment.ready().is_some());
        match &dashboard.fundamentals {
            Section::Failed(msg) => assert!(msg.starts_with("Error loading fundamentals: ")),
            other => panic!("expected failed fundamentals, got {:?}", other),
        }
        match &dashboard.prices {
            Section::Failed(msg) => {
                assert!(msg.starts_with(NO_DATA_WARNING));
                assert!(msg.contains("symbol may be delisted"));
            }
            other => panic!("expected failed prices, got {:?}", other),
        }
    }

    #[test]
    fn empty_range_is_no_data_warning() {
        let prices = MockPriceSource::new().with_points("ACME", daily_points("2024-01-01", &[1.0, 2.0, 3.0]));
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2020-01-01", "2021-01-01");

        assert!(matches!(&dashboard.prices, Section::Failed(m) if m.starts_with(NO_DATA_WARNING)));
        assert!(dashboard.fundamentals.ready().is_some());
    }

    #[test]
    fn inverted_range_withholds_prices_without_fetching() {
        let prices = MockPriceSource::new().with_points("ACME", daily_points("2024-01-01", &[1.0, 2.0]));
        let fundamentals = acme_fundamentals();
        let dashboard = run(&prices, &fundamentals, &KeywordSentiment, "ACME", "2024-02-01", "2024-01-01");

        assert_eq!(
            dashboard.validation_error.as_deref(),
            Some("Start Date must be earlier than End Date.")
        );
        assert!(matches!(dashboard.prices, Section::Skipped(_)));
        assert!(dashboard.sentiment.ready().is_some());
        assert!(dashboard.fundamentals.ready().is_some());
        assert_eq!(prices.call_count(), 0);
        assert_eq!(fundamentals.call_count(), 1);
    }

    #[test]
    fn equal_dates_are_rejected() {
        let prices = MockPriceSource::new();
        let dashboard = run(&prices, &acme_fundamentals(), &KeywordSentiment, "ACME", "2024-01-01", "2024-01-01");
        assert!(dashboard.validation_error.is_some());
        assert_eq!(prices.call_count(), 0);
    }

    #[test]
    fn blank_ticker_only_prompts() {
        let prices = MockPriceSource::new();
        let fundamentals = acme_fundamentals();
        let dashboard = run(&prices, &fundamentals, &KeywordSentiment, "   ", "2024-01-01", "2024-02-01");

        assert_eq!(dashboard.prices.message(), Some(ENTER_TICKER_PROMPT));
        assert_eq!(dashboard.sentiment.message(), Some(ENTER_TICKER_PROMPT));
        assert_eq!(prices.call_count(), 0);
        assert_eq!(fundamentals.call_count(), 0);
    }
}

mod memoized_fetchers {
    use super::*;

    #[test]
    fn repeated_renders_fetch_once() {
        let source = Arc::new(
            MockPriceSource::new().with_points("ACME", daily_points("2024-01-01", &trending_closes(30, 5.0, 0.1))),
        );
        let fundamentals_source = Arc::new(acme_fundamentals());
        let prices = CachedPrices::new(source.clone());
        let fundamentals = CachedFundamentals::new(fundamentals_source.clone());

        let a = run(&prices, &fundamentals, &KeywordSentiment, "ACME", "2024-01-01", "2024-03-01");
        let b = run(&prices, &fundamentals, &KeywordSentiment, "acme", "2024-01-01", "2024-03-01");

        assert_eq!(a, b);
        assert_eq!(source.call_count(), 1);
        assert_eq!(fundamentals_source.call_count(), 1);
    }

    #[test]
    fn new_range_refetches_prices_but_not_fundamentals() {
        let source = Arc::new(
            MockPriceSource::new().with_points("ACME", daily_points("2024-01-01", &trending_closes(30, 5.0, 0.1))),
        );
        let fundamentals_source = Arc::new(acme_fundamentals());
        let prices = CachedPrices::new(source.clone());
        let fundamentals = CachedFundamentals::new(fundamentals_source.clone());

        run(&prices, &fundamentals, &KeywordSentiment, "ACME", "2024-01-01", "2024-03-01");
        run(&prices, &fundamentals, &KeywordSentiment, "ACME", "2024-01-10", "2024-03-01");

        assert_eq!(source.call_count(), 2);
        assert_eq!(fundamentals_source.call_count(), 1);
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn failed_fetches_are_retried() {
        let source = Arc::new(MockPriceSource::new().with_error("ZZZZ", "timeout"));
        let prices = CachedPrices::new(source.clone());
        let fundamentals = acme_fundamentals();

        run(&prices, &fundamentals, &KeywordSentiment, "ZZZZ", "2024-01-01", "2024-03-01");
        run(&prices, &fundamentals, &KeywordSentiment, "ZZZZ", "2024-01-01", "2024-03-01");

        assert_eq!(source.call_count(), 2);
        assert!(prices.is_empty());
    }
}

mod csv_pipeline {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn csv_files_feed_the_dashboard() {
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "BHP", "2023-01-01", &trending_closes(210, 40.0, 0.1));
        std::fs::write(
            dir.path().join("BHP_fundamentals.csv"),
            "metric,value\nCompany Name,BHP Group Limited\nforwardPE,11.2\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let dashboard = run(&adapter, &adapter, &KeywordSentiment, "bhp", "2023-01-01", "2024-01-01");

        let f = dashboard.fundamentals.ready().unwrap();
        assert_eq!(f.get(Metric::ForwardPe), Some(&MetricValue::Number(11.2)));

        let analysis = dashboard.prices.ready().unwrap();
        assert_eq!(analysis.series.len(), 210);
        assert_eq!(analysis.series.points()[0].volume, Some(100_000));
        assert_eq!(analysis.trend, Some(Trend::Bullish));
    }

    #[test]
    fn path_like_ticker_degrades_without_leaking_directory() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        write_price_csv(root.path(), "OTHER", "2023-01-01", &trending_closes(30, 10.0, 0.1));

        let adapter = CsvAdapter::new(data_dir.clone());
        let dashboard = run(&adapter, &adapter, &KeywordSentiment, "../other", "2023-01-01", "2024-01-01");

        let warning = dashboard.prices.message().unwrap();
        assert!(warning.starts_with(NO_DATA_WARNING));
        assert!(warning.contains("invalid ticker symbol"));
        assert!(matches!(dashboard.fundamentals, Section::Failed(_)));
        assert!(dashboard.sentiment.ready().is_some());
    }

    #[test]
    fn missing_file_warning_names_file_not_directory() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let dashboard = run(&adapter, &adapter, &KeywordSentiment, "NOPE", "2023-01-01", "2024-01-01");

        let warning = dashboard.prices.message().unwrap();
        assert!(warning.contains("NOPE.csv"));
        assert!(!warning.contains(&*dir.path().to_string_lossy()));
    }
}
