//! Web server adapter.
//!
//! Axum server with an HTMX front end: the form on `/` swaps the analysis
//! fragment from `/analyze` in place, and the same URL serves a full page
//! when requested directly.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::domain::dashboard::DashboardConfig;
use crate::ports::data_port::{FundamentalsPort, PricePort};
use crate::ports::sentiment_port::SentimentPort;

pub struct AppState {
    pub prices: Arc<dyn PricePort + Send + Sync>,
    pub fundamentals: Arc<dyn FundamentalsPort + Send + Sync>,
    pub sentiment: Arc<dyn SentimentPort + Send + Sync>,
    pub dashboard: DashboardConfig,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", get(handlers::analyze))
        .route("/chart/{kind}", get(handlers::chart_svg))
        .route("/healthz", get(handlers::healthz))
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
