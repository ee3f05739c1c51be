//! Plain-text rendering of a `Dashboard` for the terminal.
//!
//! Section order follows the page: sentiment, fundamentals, price preview,
//! latest indicator readings and the trend insight.

use crate::domain::dashboard::{Dashboard, PriceAnalysis, Section};
use crate::domain::fundamentals::Fundamentals;
use crate::domain::sentiment::SentimentReport;
use std::fmt::Write;

/// Blank for missing values, two decimals otherwise. NaN prints as `NaN`.
pub fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) => format!("{:.2}", v),
        None => String::new(),
    }
}

fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c.as_ref(), width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = String::new();
    for line in std::iter::once(render_row(headers, &widths))
        .chain(std::iter::once(render_row(rule.as_slice(), &widths)))
        .chain(rows.iter().map(|r| render_row(r.as_slice(), &widths)))
    {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn write_sentiment(out: &mut String, report: &SentimentReport) {
    let rows: Vec<Vec<String>> = report
        .headlines
        .iter()
        .map(|h| {
            vec![
                h.headline.clone(),
                format!("{:.3}", h.polarity),
                format!("{:.3}", h.subjectivity),
            ]
        })
        .collect();
    out.push_str(&table(&["Headline", "Polarity", "Subjectivity"], &rows));
    let _ = writeln!(out, "\n{}", report.summary.overall_line());
    let _ = writeln!(out, "{}", report.summary.subjectivity_line());
}

fn write_fundamentals(out: &mut String, fundamentals: &Fundamentals) {
    let _ = writeln!(out, "Reported for {}:", fundamentals.ticker());
    let rows: Vec<Vec<String>> = fundamentals
        .rows()
        .map(|(label, value)| {
            vec![
                label.to_string(),
                value.map(ToString::to_string).unwrap_or_default(),
            ]
        })
        .collect();
    out.push_str(&table(&["Metric", "Value"], &rows));
}

fn write_prices(out: &mut String, analysis: &PriceAnalysis, request: &Dashboard, preview_rows: usize) {
    let req = &request.request;
    let _ = writeln!(out, "Data from {} to {}:", req.start, req.end);
    let rows: Vec<Vec<String>> = analysis
        .series
        .head(preview_rows)
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                fmt_opt(p.open),
                fmt_opt(p.high),
                fmt_opt(p.low),
                format!("{:.2}", p.close),
                p.volume.map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    out.push_str(&table(&["Date", "Open", "High", "Low", "Close", "Volume"], &rows));

    let cfg = analysis.indicators.config;
    if let Some(last) = analysis.indicators.last() {
        let _ = writeln!(out, "\n## Latest Indicators ({})\n", last.date);
        let rows = vec![
            vec!["Close".to_string(), format!("{:.2}", last.close)],
            vec![cfg.short_sma().to_string(), fmt_opt(last.sma_short)],
            vec![cfg.long_sma().to_string(), fmt_opt(last.sma_long)],
            vec![cfg.rsi().to_string(), fmt_opt(last.rsi)],
            vec![cfg.stop_loss().to_string(), fmt_opt(last.stop_loss)],
        ];
        out.push_str(&table(&["Indicator", "Value"], &rows));
    }

    out.push_str("\n## Bullish or Bearish Insights\n\n");
    if let Some(trend) = analysis.trend {
        let _ = writeln!(out, "{}", trend.message());
    }
    if analysis.insufficient_history() {
        let _ = writeln!(
            out,
            "Not enough history for the {}-day moving average in this range.",
            cfg.long_window
        );
    }
}

fn write_message<T>(out: &mut String, section: &Section<T>) {
    if let Some(msg) = section.message() {
        let _ = writeln!(out, "{}", msg);
    }
}

pub fn format_dashboard(dashboard: &Dashboard, preview_rows: usize) -> String {
    let mut out = String::new();
    let ticker = &dashboard.request.ticker;
    out.push_str("# Stock Analysis Dashboard\n\n");

    if !dashboard.request.has_ticker() {
        write_message(&mut out, &dashboard.prices);
        return out;
    }

    if let Some(err) = &dashboard.validation_error {
        let _ = writeln!(out, "Error: {}\n", err);
    }

    out.push_str("## Sentiment Analysis of Stock-related Headlines\n\n");
    match &dashboard.sentiment {
        Section::Ready(report) => write_sentiment(&mut out, report),
        other => write_message(&mut out, other),
    }

    out.push_str("\n## Fundamentals\n\n");
    match &dashboard.fundamentals {
        Section::Ready(f) => write_fundamentals(&mut out, f),
        other => write_message(&mut out, other),
    }

    match &dashboard.prices {
        Section::Ready(analysis) => {
            let _ = writeln!(out, "\n## Stock Data for {}\n", ticker);
            write_prices(&mut out, analysis, dashboard, preview_rows);
        }
        Section::Failed(msg) => {
            let _ = writeln!(out, "\nWarning: {}", msg);
        }
        Section::Skipped(_) => {}
    }

    out
}
