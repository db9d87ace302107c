//! Volume indicators: volume ratio, On-Balance Volume and Chaikin Oscillator

use crate::indicators::ema::ExponentialMovingAverage;
use crate::indicators::rolling::{cumulative_sum, lag};

/// Volume relative to the volume `lookback` rows earlier
pub fn volume_ratio(volume: &[f64], lookback: usize) -> Vec<f64> {
    volume
        .iter()
        .zip(lag(volume, lookback))
        .map(|(v, prev)| v / prev)
        .collect()
}

/// Signed volume for one row: negative when the price change is negative,
/// positive otherwise (including an undefined change).
#[inline]
pub fn signed_volume(volume: f64, change: f64) -> f64 {
    if change < 0.0 {
        -volume
    } else {
        volume
    }
}

/// On-Balance Volume: running sum of [`signed_volume`]
pub fn on_balance_volume(volume: &[f64], changes: &[f64]) -> Vec<f64> {
    let signed: Vec<f64> = volume
        .iter()
        .zip(changes)
        .map(|(&v, &c)| signed_volume(v, c))
        .collect();
    cumulative_sum(&signed)
}

/// Money-flow multiplier, `((close - low) / range) / range`.
///
/// The range divides twice. A zero range is non-finite.
#[inline]
pub fn money_flow_multiplier(high: f64, low: f64, close: f64) -> f64 {
    let range = high - low;
    ((close - low) / range) / range
}

/// Accumulation/Distribution line: running sum of money-flow volume.
///
/// One zero-range row makes this and every later row non-finite.
pub fn accumulation_distribution(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
    let money_flow_volume: Vec<f64> = high
        .iter()
        .zip(low)
        .zip(close.iter().zip(volume))
        .map(|((&h, &l), (&c, &v))| v * money_flow_multiplier(h, l, c))
        .collect();
    cumulative_sum(&money_flow_volume)
}

/// Chaikin Oscillator: fast EMA minus slow EMA of the A/D line.
///
/// Rows where the A/D line is undefined stay undefined instead of repeating
/// the last smoothed value.
pub fn chaikin_oscillator(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    fast: usize,
    slow: usize,
) -> Vec<f64> {
    let adl = accumulation_distribution(high, low, close, volume);
    let fast = ExponentialMovingAverage::compute(fast, &adl);
    let slow = ExponentialMovingAverage::compute(slow, &adl);
    adl.iter()
        .zip(fast.iter().zip(&slow))
        .map(|(a, (f, s))| if a.is_nan() { f64::NAN } else { f - s })
        .collect()
}
