//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(close[i-n+1..=i])
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator_helpers::rolling_mean;

pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    rolling_mean(&values, period)
}
