//! HTML templates using Askama, and the string view model they render.

use askama::Template;

use crate::adapters::chart_svg::render_all;
use crate::adapters::text_report::fmt_opt;
use crate::domain::dashboard::{Dashboard, Section};
use crate::domain::trend::Trend;

pub struct FormView {
    pub ticker: String,
    pub start: String,
    pub end: String,
}

pub struct HeadlineRow {
    pub headline: String,
    pub polarity: String,
    pub subjectivity: String,
}

pub struct FundamentalRow {
    pub label: String,
    pub value: String,
}

pub struct PriceRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

pub struct ChartView {
    pub slug: String,
    pub title: String,
    pub svg: String,
}

pub struct TrendView {
    /// CSS class: success, warning or info.
    pub class: String,
    pub message: String,
}

#[derive(Default)]
pub struct DashboardView {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub prompt: Option<String>,
    pub validation_error: Option<String>,
    pub headlines: Vec<HeadlineRow>,
    pub sentiment_overall: Option<String>,
    pub sentiment_subjectivity: Option<String>,
    pub sentiment_error: Option<String>,
    pub fundamentals_ticker: Option<String>,
    pub fundamentals: Vec<FundamentalRow>,
    pub fundamentals_error: Option<String>,
    pub preview: Vec<PriceRow>,
    pub price_warning: Option<String>,
    pub charts: Vec<ChartView>,
    pub trend: Option<TrendView>,
    pub insufficient_history: Option<String>,
}

fn failure<T>(section: &Section<T>) -> Option<String> {
    match section {
        Section::Failed(m) => Some(m.clone()),
        _ => None,
    }
}

impl DashboardView {
    pub fn from_dashboard(dashboard: &Dashboard, preview_rows: usize) -> Self {
        let req = &dashboard.request;
        let mut view = DashboardView {
            ticker: req.ticker.clone(),
            start: req.start.to_string(),
            end: req.end.to_string(),
            ..Default::default()
        };

        if !req.has_ticker() {
            view.prompt = dashboard.prices.message().map(str::to_string);
            return view;
        }

        view.validation_error = dashboard.validation_error.clone();

        if let Some(report) = dashboard.sentiment.ready() {
            view.headlines = report
                .headlines
                .iter()
                .map(|h| HeadlineRow {
                    headline: h.headline.clone(),
                    polarity: format!("{:.3}", h.polarity),
                    subjectivity: format!("{:.3}", h.subjectivity),
                })
                .collect();
            view.sentiment_overall = Some(report.summary.overall_line());
            view.sentiment_subjectivity = Some(report.summary.subjectivity_line());
        }
        view.sentiment_error = failure(&dashboard.sentiment);

        if let Some(f) = dashboard.fundamentals.ready() {
            view.fundamentals_ticker = Some(f.ticker().to_string());
            view.fundamentals = f
                .rows()
                .map(|(label, value)| FundamentalRow {
                    label: label.to_string(),
                    value: value.map(ToString::to_string).unwrap_or_default(),
                })
                .collect();
        }
        view.fundamentals_error = failure(&dashboard.fundamentals);

        if let Some(analysis) = dashboard.prices.ready() {
            view.preview = analysis
                .series
                .head(preview_rows)
                .iter()
                .map(|p| PriceRow {
                    date: p.date.to_string(),
                    open: fmt_opt(p.open),
                    high: fmt_opt(p.high),
                    low: fmt_opt(p.low),
                    close: format!("{:.2}", p.close),
                    volume: p.volume.map(|v| v.to_string()).unwrap_or_default(),
                })
                .collect();
            view.charts = render_all(analysis)
                .into_iter()
                .map(|(kind, svg)| ChartView {
                    slug: kind.slug().to_string(),
                    title: kind.title(&req.ticker),
                    svg,
                })
                .collect();
            view.trend = analysis.trend.map(|t| TrendView {
                class: match t {
                    Trend::Bullish => "success",
                    Trend::Bearish => "warning",
                    Trend::Converging => "info",
                }
                .to_string(),
                message: t.message().to_string(),
            });
            if analysis.insufficient_history() {
                view.insufficient_history = Some(format!(
                    "Not enough history for the {}-day moving average in this range.",
                    analysis.indicators.config.long_window
                ));
            }
        }
        view.price_warning = failure(&dashboard.prices);

        view
    }

    pub fn form(&self) -> FormView {
        FormView {
            ticker: self.ticker.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: FormView,
    pub prompt: String,
}

#[derive(Template)]
#[template(path = "analysis.html")]
pub struct AnalysisPage {
    pub form: FormView,
    pub view: DashboardView,
}

#[derive(Template)]
#[template(path = "analysis_fragment.html")]
pub struct AnalysisFragment {
    pub view: DashboardView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
