//! RSI (Relative Strength Index) with simple rolling averages.
//!
//! delta[i] = close[i] - close[i-1], absent at i = 0
//! gain = max(delta, 0), loss = max(-delta, 0)
//! avg_gain, avg_loss = rolling mean over n (absent if the window holds i = 0)
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! The division is left to IEEE-754: avg_loss == 0 gives RSI 100 when there
//! are gains and NaN when there are none.
//!
//! Warmup: first n values are undefined.

use crate::domain::indicator_helpers::rolling_mean;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.len() < 2 {
        return vec![None; closes.len()];
    }

    let deltas: Vec<Option<f64>> = std::iter::once(None)
        .chain(closes.windows(2).map(|w| Some(w[1] - w[0])))
        .collect();
    let gains: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) => {
                let rs = g / l;
                Some(100.0 - 100.0 / (1.0 + rs))
            }
            _ => None,
        })
        .collect()
}
