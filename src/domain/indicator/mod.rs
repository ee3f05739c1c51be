//! Technical indicator implementations.
//!
//! Every indicator here is a trailing rolling-window transform over closes:
//! - `IndicatorType`: indicator identity + window, used for labels
//! - `IndicatorConfig`: the four windows the dashboard computes
//! - `IndicatorRow`: one date's derived values, `None` while warming up
//! - `IndicatorSeries`: rows aligned index-for-index with a `PriceSeries`

pub mod rsi;
pub mod sma;
pub mod stop_loss;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    StopLoss(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::StopLoss(period) => write!(f, "STOPLOSS({})", period),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub rsi_window: usize,
    pub stop_loss_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
            rsi_window: 14,
            stop_loss_window: 14,
        }
    }
}

impl IndicatorConfig {
    pub fn short_sma(&self) -> IndicatorType {
        IndicatorType::Sma(self.short_window)
    }

    pub fn long_sma(&self) -> IndicatorType {
        IndicatorType::Sma(self.long_window)
    }

    pub fn rsi(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_window)
    }

    pub fn stop_loss(&self) -> IndicatorType {
        IndicatorType::StopLoss(self.stop_loss_window)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    /// `Some(NaN)` when both average gain and average loss are zero.
    pub rsi: Option<f64>,
    pub stop_loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub config: IndicatorConfig,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Values projected into one column, for charting.
    pub fn column(&self, indicator: IndicatorType) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| match indicator {
                IndicatorType::Sma(w) if w == self.config.short_window => row.sma_short,
                IndicatorType::Sma(w) if w == self.config.long_window => row.sma_long,
                IndicatorType::Rsi(w) if w == self.config.rsi_window => row.rsi,
                IndicatorType::StopLoss(w) if w == self.config.stop_loss_window => row.stop_loss,
                _ => None,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| Some(row.close)).collect()
    }

    /// Same-bits comparison, so NaN RSI values compare equal to themselves.
    pub fn bit_identical(&self, other: &IndicatorSeries) -> bool {
        fn same(a: Option<f64>, b: Option<f64>) -> bool {
            match (a, b) {
                (Some(x), Some(y)) => x.to_bits() == y.to_bits(),
                (None, None) => true,
                _ => false,
            }
        }

        self.config == other.config
            && self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(a, b)| {
                a.date == b.date
                    && a.close.to_bits() == b.close.to_bits()
                    && same(a.sma_short, b.sma_short)
                    && same(a.sma_long, b.sma_long)
                    && same(a.rsi, b.rsi)
                    && same(a.stop_loss, b.stop_loss)
            })
    }
}
