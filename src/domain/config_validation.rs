//! Configuration validation.
//!
//! Every key is optional; present keys must hold usable values.

use crate::domain::error::DashError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::net::SocketAddr;

pub const DATA_SOURCES: [&str; 2] = ["yahoo", "csv"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DashError> {
    validate_data_source(config)?;
    validate_timeout(config)?;
    validate_windows(config)?;
    validate_preview_rows(config)?;
    validate_default_dates(config)?;
    validate_listen(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DashError {
    DashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), DashError> {
    let source = match config.get_string("data", "source") {
        Some(s) => s.trim().to_lowercase(),
        None => return Ok(()),
    };
    if !DATA_SOURCES.contains(&source.as_str()) {
        return Err(invalid(
            "data",
            "source",
            format!("unknown source '{}', expected one of {}", source, DATA_SOURCES.join(", ")),
        ));
    }
    if source == "csv" {
        match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            _ => {
                return Err(DashError::ConfigMissing {
                    section: "data".to_string(),
                    key: "csv_dir".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Parse an optional positive integer, rejecting non-numeric text that
/// `get_int` would silently replace with its default.
fn positive_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<usize>, DashError> {
    let raw = match config.get_string(section, key) {
        Some(s) => s,
        None => return Ok(None),
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(invalid(section, key, format!("{} must be positive", key))),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(invalid(section, key, format!("'{}' is not a whole number", raw.trim()))),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), DashError> {
    positive_int(config, "data", "timeout_secs").map(|_| ())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), DashError> {
    let short = positive_int(config, "indicators", "short_window")?.unwrap_or(50);
    let long = positive_int(config, "indicators", "long_window")?.unwrap_or(200);
    positive_int(config, "indicators", "rsi_window")?;
    positive_int(config, "indicators", "stop_loss_window")?;

    if short >= long {
        return Err(invalid(
            "indicators",
            "short_window",
            "short_window must be smaller than long_window",
        ));
    }
    Ok(())
}

fn validate_preview_rows(config: &dyn ConfigPort) -> Result<(), DashError> {
    positive_int(config, "dashboard", "preview_rows").map(|_| ())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, DashError> {
    match config.get_string("dashboard", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("dashboard", key, format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

fn validate_default_dates(config: &dyn ConfigPort) -> Result<(), DashError> {
    let start = parse_date(config, "default_start")?;
    let end = parse_date(config, "default_end")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "dashboard",
                "default_start",
                "default_start must be before default_end",
            ));
        }
    }
    Ok(())
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), DashError> {
    match config.get_string("web", "listen") {
        None => Ok(()),
        Some(addr) => addr
            .trim()
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|e| invalid("web", "listen", e.to_string())),
    }
}
