//! Shared rolling-window machinery and the combined indicator pass.
//!
//! Window rule for every indicator: the value at `i` uses the `period`
//! observations ending at `i` inclusive. Fewer than `period` observations, or
//! any absent observation inside the window, leaves the output `None`.

use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stop_loss::calculate_stop_loss;
use crate::domain::indicator::{IndicatorConfig, IndicatorRow, IndicatorSeries};
use crate::domain::price::PriceSeries;

/// Apply `reduce` to every full trailing window of `values`.
pub fn rolling_window<F>(values: &[Option<f64>], period: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut buf: Vec<f64> = Vec::with_capacity(period);

    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }

        buf.clear();
        let window = &values[i + 1 - period..=i];
        let complete = window.iter().all(|v| match v {
            Some(x) => {
                buf.push(*x);
                true
            }
            None => false,
        });

        out.push(if complete { Some(reduce(&buf)) } else { None });
    }

    out
}

pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling_window(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling_window(values, period, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Compute every dashboard indicator for `series`. Pure: identical input
/// yields bit-identical output.
pub fn compute_indicators(series: &PriceSeries, config: &IndicatorConfig) -> IndicatorSeries {
    let closes = series.closes();

    let sma_short = calculate_sma(&closes, config.short_window);
    let sma_long = calculate_sma(&closes, config.long_window);
    let rsi = calculate_rsi(&closes, config.rsi_window);
    let stop_loss = calculate_stop_loss(&closes, config.stop_loss_window);

    let rows = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            date: point.date,
            close: point.close,
            sma_short: sma_short[i],
            sma_long: sma_long[i],
            rsi: rsi[i],
            stop_loss: stop_loss[i],
        })
        .collect();

    IndicatorSeries {
        config: *config,
        rows,
    }
}
