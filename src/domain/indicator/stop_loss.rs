//! Rolling-minimum stop-loss level.
//!
//! STOPLOSS(n)[i] = min(close[i-n+1..=i])
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator_helpers::rolling_min;

pub fn calculate_stop_loss(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    rolling_min(&values, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stop_loss_warmup() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = calculate_stop_loss(&closes, 14);
        assert!(out[..13].iter().all(Option::is_none));
        assert_eq!(out[13], Some(100.0));
        assert_eq!(out[19], Some(106.0));
    }

    #[test]
    fn stop_loss_holds_recent_low() {
        let closes = [10.0, 8.0, 9.0, 12.0, 11.0];
        let out = calculate_stop_loss(&closes, 3);
        assert_eq!(out, vec![None, None, Some(8.0), Some(8.0), Some(9.0)]);
    }

    proptest! {
        #[test]
        fn stop_loss_is_trailing_min(
            closes in prop::collection::vec(1.0f64..1000.0, 0..60),
        ) {
            let out = calculate_stop_loss(&closes, 14);
            prop_assert_eq!(out.len(), closes.len());
            for (i, v) in out.iter().enumerate() {
                if i >= 13 {
                    let expected = closes[i - 13..=i].iter().copied().fold(f64::INFINITY, f64::min);
                    prop_assert_eq!(*v, Some(expected));
                } else {
                    prop_assert!(v.is_none());
                }
            }
        }
    }
}
