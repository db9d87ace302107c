//! Momentum indicators: Stochastic Oscillator, CCI and Wilder RSI

use crate::error::{FeatureError, Result};
use crate::indicators::rolling::{rolling_max, rolling_mean, rolling_min};

/// Fast %K over closes: position of the close inside its trailing
/// `window`-row close range, scaled to 0..100.
///
/// A flat window divides by zero and is left undefined.
pub fn stochastic_oscillator(close: &[f64], window: usize) -> Vec<f64> {
    let lowest = rolling_min(close, window);
    let highest = rolling_max(close, window);

    close
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(c, (lo, hi))| (c - lo) / (hi - lo) * 100.0)
        .collect()
}

/// Commodity Channel Index on typical prices.
///
/// The mean deviation is itself a trailing mean of each row's distance from
/// its own rolling mean, so the first defined value sits at row
/// `2 * window - 2`.
pub fn commodity_channel_index(typical_price: &[f64], window: usize, scale: f64) -> Vec<f64> {
    let mean = rolling_mean(typical_price, window);
    let deviation: Vec<f64> = typical_price
        .iter()
        .zip(&mean)
        .map(|(tp, m)| (tp - m).abs())
        .collect();
    let mean_deviation = rolling_mean(&deviation, window);

    typical_price
        .iter()
        .zip(mean.iter().zip(&mean_deviation))
        .map(|(tp, (m, md))| (tp - m) / (scale * md))
        .collect()
}

/// `rs` used in place of an infinite ratio when the average loss is zero
pub const RS_WHEN_NO_LOSS: f64 = 100.0;

/// Wilder-smoothed RSI accumulator over one-row price changes.
///
/// Each row updates exactly one side: a positive change feeds `avg_gain`,
/// anything else feeds `avg_loss`, and the other side is carried unchanged.
/// With no losses the ratio is pinned at [`RS_WHEN_NO_LOSS`], so the RSI
/// ceiling is `100 - 100 / 101` rather than 100.
#[derive(Debug, Clone)]
pub struct WilderRsi {
    period: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderRsi {
    /// Seed averages from the first `period` changes. Undefined changes
    /// count towards neither side.
    pub fn seed(changes: &[f64], period: usize) -> Result<Self> {
        if period == 0 || changes.len() < period {
            return Err(FeatureError::insufficient("rsi", period.max(1), changes.len()));
        }

        let window = &changes[..period];
        let gains: f64 = window.iter().filter(|&&c| c > 0.0).sum();
        let losses: f64 = window.iter().filter(|&&c| c < 0.0).sum();

        Ok(Self {
            period,
            avg_gain: gains / period as f64,
            avg_loss: losses.abs() / period as f64,
        })
    }

    /// Fold one change into the averages and return the RSI
    pub fn update(&mut self, change: f64) -> f64 {
        let carry = (self.period - 1) as f64;
        let period = self.period as f64;

        if change > 0.0 {
            self.avg_gain = (self.avg_gain * carry + change) / period;
        } else {
            self.avg_loss = (self.avg_loss * carry + change.abs()) / period;
        }

        self.value()
    }

    /// RSI from the current averages
    pub fn value(&self) -> f64 {
        let rs = if self.avg_loss == 0.0 {
            RS_WHEN_NO_LOSS
        } else {
            self.avg_gain / self.avg_loss
        };
        100.0 - 100.0 / (1.0 + rs)
    }

    pub fn avg_gain(&self) -> f64 {
        self.avg_gain
    }

    pub fn avg_loss(&self) -> f64 {
        self.avg_loss
    }
}

/// RSI over a full change series. The first `period` rows only seed the
/// averages and are undefined.
pub fn rsi(changes: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut state = WilderRsi::seed(changes, period)?;
    let mut out = vec![f64::NAN; changes.len()];
    for (i, &change) in changes.iter().enumerate().skip(period) {
        out[i] = state.update(change);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stochastic_range() {
        let close = [1.0, 2.0, 3.0, 2.0, 1.5];
        let k = stochastic_oscillator(&close, 3);
        assert!(k[0].is_nan() && k[1].is_nan());
        assert_relative_eq!(k[2], 100.0);
        assert_relative_eq!(k[3], 0.0);
        assert_relative_eq!(k[4], 0.0);
    }

    #[test]
    fn test_stochastic_flat_window_undefined() {
        let k = stochastic_oscillator(&[5.0; 6], 3);
        assert!(k[2..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_cci_warmup_and_scale() {
        let tp: Vec<f64> = (0..10).map(|i| if i % 2 == 0 { 10.0 } else { 12.0 }).collect();
        let cci = commodity_channel_index(&tp, 3, 0.15);
        assert!(cci[..4].iter().all(|v| v.is_nan()));
        assert!(cci[4..].iter().all(|v| v.is_finite()));

        // Row 4: tp = 10, mean = 32/3, deviations over rows 2..=4 are all 2/3
        assert_relative_eq!(cci[4], (10.0 - 32.0 / 3.0) / (0.15 * (2.0 / 3.0)), epsilon = 1e-9);
    }

    #[test]
    fn test_cci_constant_undefined() {
        let cci = commodity_channel_index(&[7.0; 10], 3, 0.15);
        assert!(cci[4..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_wilder_seed_and_recurrence() {
        // 14 changes: gains sum to 14, losses sum to 7
        let changes = [2.0, -1.0].repeat(7);
        let mut state = WilderRsi::seed(&changes, 14).unwrap();
        assert_relative_eq!(state.avg_gain(), 1.0);
        assert_relative_eq!(state.avg_loss(), 0.5);
        assert_relative_eq!(state.value(), 100.0 - 100.0 / 3.0);

        // Gain updates only avg_gain
        let value = state.update(3.0);
        assert_relative_eq!(state.avg_gain(), (13.0 + 3.0) / 14.0);
        assert_relative_eq!(state.avg_loss(), 0.5);
        let rs = (16.0 / 14.0) / 0.5;
        assert_relative_eq!(value, 100.0 - 100.0 / (1.0 + rs), epsilon = 1e-12);

        // Zero change counts as a loss-side update
        state.update(0.0);
        assert_relative_eq!(state.avg_loss(), 0.5 * 13.0 / 14.0);
    }

    #[test]
    fn test_no_loss_pins_ratio() {
        let changes = vec![1.0; 20];
        let out = rsi(&changes, 14).unwrap();
        assert!(out[..14].iter().all(|v| v.is_nan()));
        for v in &out[14..] {
            assert_relative_eq!(*v, 100.0 - 100.0 / 101.0);
            assert!((v - 99.0099).abs() < 1e-4);
        }
    }

    #[test]
    fn test_undefined_seed_change_is_ignored() {
        let mut changes = vec![f64::NAN];
        changes.extend(std::iter::repeat(-1.0).take(14));
        let state = WilderRsi::seed(&changes, 14).unwrap();
        assert_eq!(state.avg_gain(), 0.0);
        assert_relative_eq!(state.avg_loss(), 13.0 / 14.0);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn test_rsi_insufficient_history() {
        assert!(matches!(
            rsi(&[1.0; 10], 14),
            Err(FeatureError::InsufficientHistory { required: 14, available: 10, .. })
        ));
    }
}
