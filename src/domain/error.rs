//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("start date {start} must be earlier than end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("fetch failed for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("unexpected response for {ticker}: {reason}")]
    Parse { ticker: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub fn fetch(ticker: &str, reason: impl Into<String>) -> Self {
        DashError::Fetch {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(ticker: &str, reason: impl Into<String>) -> Self {
        DashError::Parse {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DashError> for std::process::ExitCode {
    fn from(err: &DashError) -> Self {
        let code: u8 = match err {
            DashError::Io(_) => 1,
            DashError::ConfigParse { .. }
            | DashError::ConfigMissing { .. }
            | DashError::ConfigInvalid { .. }
            | DashError::InvalidDateRange { .. } => 2,
            DashError::Fetch { .. } | DashError::Parse { .. } => 3,
            DashError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
