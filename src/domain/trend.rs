//! Moving-average trend classification on the most recent row.

use crate::domain::indicator::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Short SMA above long SMA (Golden Cross).
    Bullish,
    /// Short SMA below long SMA (Death Cross).
    Bearish,
    /// Neither is strictly greater. Undefined SMAs land here as well, the
    /// same way NaN comparisons fall through.
    Converging,
}

impl Trend {
    pub fn classify(short: Option<f64>, long: Option<f64>) -> Self {
        match (short, long) {
            (Some(s), Some(l)) if s > l => Trend::Bullish,
            (Some(s), Some(l)) if s < l => Trend::Bearish,
            _ => Trend::Converging,
        }
    }

    /// Classify the final row of `series`; `None` for an empty series.
    pub fn from_series(series: &IndicatorSeries) -> Option<Self> {
        series
            .last()
            .map(|row| Trend::classify(row.sma_short, row.sma_long))
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Converging => "neutral",
        }
    }

    pub fn signal(self) -> Option<&'static str> {
        match self {
            Trend::Bullish => Some("Golden Cross"),
            Trend::Bearish => Some("Death Cross"),
            Trend::Converging => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Trend::Bullish => "The stock is in a bullish trend (Golden Cross detected).",
            Trend::Bearish => "The stock is in a bearish trend (Death Cross detected).",
            Trend::Converging => {
                "The moving averages are converging. Watch for potential crossovers."
            }
        }
    }
}
