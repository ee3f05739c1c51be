//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod indicator_helpers;
pub mod trend;
pub mod sentiment;
pub mod fundamentals;
pub mod dashboard;
pub mod config_validation;
pub mod error;
