//! Volatility indicators: return volatility, Bollinger measure and ATR

use crate::indicators::rolling::{lead, rolling_mean, rolling_std};

/// Rolling sample standard deviation of returns
pub fn return_volatility(returns: &[f64], window: usize) -> Vec<f64> {
    rolling_std(returns, window)
}

/// Distance of the close from its rolling mean in units of the band width,
/// `(close - mean) / (width * std)`.
///
/// A flat window (zero standard deviation) gives exactly 0, as does a close
/// sitting exactly on the mean.
pub fn bollinger(close: &[f64], window: usize, width: f64) -> Vec<f64> {
    let mean = rolling_mean(close, window);
    let std = rolling_std(close, window);

    close
        .iter()
        .zip(mean.iter().zip(&std))
        .map(|(c, (m, s))| {
            let deviation = c - m;
            if deviation == 0.0 || *s == 0.0 {
                0.0
            } else {
                deviation / (width * s)
            }
        })
        .collect()
}

/// True range against the *next* row's close.
///
/// Acausal: row `i` reads `close[i + 1]`. The spreads are signed, and an
/// undefined spread (the last row) is skipped so that row falls back to
/// `high - low`.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let next_close = lead(close, 1);

    high.iter()
        .zip(low)
        .zip(&next_close)
        .map(|((h, l), nc)| (h - l).max(h - nc).max(l - nc))
        .collect()
}

/// Average True Range: trailing mean of [`true_range`]
pub fn average_true_range(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<f64> {
    rolling_mean(&true_range(high, low, close), window)
}
