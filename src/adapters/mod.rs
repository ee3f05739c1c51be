//! Concrete adapter implementations for ports.

pub mod cache;
pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod lexicon_sentiment;
pub mod text_report;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
