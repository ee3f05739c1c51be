//! HTTP request handlers for the web adapter.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::chart_svg::{render_chart, ChartKind};
use crate::domain::dashboard::{render, DashboardPorts, DashboardRequest, ENTER_TICKER_PROMPT};
use crate::domain::indicator_helpers::compute_indicators;

use super::templates::{AnalysisFragment, AnalysisPage, DashboardView, FormView, IndexTemplate};
use super::{is_htmx_request, AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn parse_date(raw: Option<&str>, default: NaiveDate, field: &str) -> Result<NaiveDate, WebError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| WebError::bad_request(format!("Invalid {field} date format, expected YYYY-MM-DD"))),
    }
}

impl AnalyzeParams {
    fn to_request(&self, state: &AppState) -> Result<DashboardRequest, WebError> {
        let start = parse_date(self.start.as_deref(), state.default_start, "start")?;
        let end = parse_date(self.end.as_deref(), state.default_end, "end")?;
        Ok(DashboardRequest::new(
            self.ticker.as_deref().unwrap_or_default(),
            start,
            end,
        ))
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let template = IndexTemplate {
        form: FormView {
            ticker: String::new(),
            start: state.default_start.to_string(),
            end: state.default_end.to_string(),
        },
        prompt: ENTER_TICKER_PROMPT.to_string(),
    };
    Ok(Html(template.render()?).into_response())
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AnalyzeParams>,
) -> Result<Response, WebError> {
    let request = params.to_request(&state)?;
    let preview_rows = state.dashboard.preview_rows;

    let worker = Arc::clone(&state);
    let dashboard = tokio::task::spawn_blocking(move || {
        let ports = DashboardPorts {
            prices: worker.prices.as_ref(),
            fundamentals: worker.fundamentals.as_ref(),
            sentiment: worker.sentiment.as_ref(),
        };
        render(&ports, &request, &worker.dashboard)
    })
    .await
    .map_err(|e| WebError::internal(format!("analysis task failed: {e}")))?;

    let view = DashboardView::from_dashboard(&dashboard, preview_rows);
    let html = if is_htmx_request(&headers) {
        AnalysisFragment { view }.render()?
    } else {
        AnalysisPage {
            form: view.form(),
            view,
        }
        .render()?
    };
    Ok(Html(html).into_response())
}

pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Response, WebError> {
    let kind = ChartKind::parse(&kind).ok_or_else(|| WebError::not_found(format!("Unknown chart '{kind}'")))?;
    let request = params.to_request(&state)?;
    if !request.has_ticker() {
        return Err(WebError::bad_request(ENTER_TICKER_PROMPT));
    }
    request.validate_range()?;

    let worker = Arc::clone(&state);
    let svg = tokio::task::spawn_blocking(move || {
        let series = worker
            .prices
            .fetch_prices(&request.ticker, request.start, request.end)?;
        let indicators = compute_indicators(&series, &worker.dashboard.indicators);
        Ok::<_, crate::domain::error::DashError>(render_chart(kind, &request.ticker, &indicators))
    })
    .await
    .map_err(|e| WebError::internal(format!("chart task failed: {e}")))??;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn not_found() -> Response {
    WebError::new(StatusCode::NOT_FOUND, "Page not found").into_response()
}
