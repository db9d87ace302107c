//! Rolling-window and shift primitives shared by the indicator groups
//!
//! All helpers follow the same undefined-value convention: a window that is
//! not yet full, or that contains an undefined value, yields `NaN`.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Fixed-size trailing window over a series
#[derive(Debug, Clone)]
pub struct RollingWindow {
    window: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// Create new window of the given size
    pub fn new(window: usize) -> Self {
        if window == 0 {
            panic!("Window size must be greater than 0");
        }
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Push a value, evicting the oldest once full
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.window {
            self.values.pop_front();
        }
    }

    /// Window holds `window` values and none of them is NaN
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.window && !self.values.iter().any(|v| v.is_nan())
    }

    /// Ready window whose values are all identical
    pub fn is_flat(&self) -> bool {
        self.is_ready() && self.values.iter().all(|&v| v == self.values[0])
    }

    /// Arithmetic mean. A flat window returns its value exactly, free of
    /// summation rounding.
    pub fn mean(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        if self.is_flat() {
            return self.values[0];
        }
        self.values.iter().sum::<f64>() / self.window as f64
    }

    /// Sample standard deviation (n - 1 denominator), exactly 0 on a flat
    /// window
    pub fn std_dev(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        if self.is_flat() {
            return 0.0;
        }
        self.values.iter().std_dev()
    }

    pub fn min(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

fn rolling_map(values: &[f64], window: usize, stat: impl Fn(&RollingWindow) -> f64) -> Vec<f64> {
    let mut rolling = RollingWindow::new(window);
    values
        .iter()
        .map(|&v| {
            rolling.push(v);
            stat(&rolling)
        })
        .collect()
}

/// Trailing mean over `window` rows
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_map(values, window, RollingWindow::mean)
}

/// Trailing sample standard deviation over `window` rows
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_map(values, window, RollingWindow::std_dev)
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_map(values, window, RollingWindow::min)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_map(values, window, RollingWindow::max)
}

/// Value from `periods` rows earlier; NaN where no such row exists
pub fn lag(values: &[f64], periods: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| i.checked_sub(periods).map_or(f64::NAN, |j| values[j]))
        .collect()
}

/// Value from `periods` rows later; NaN past the end.
///
/// This reads the future and must only be used where a stage is explicitly
/// documented as acausal.
pub fn lead(values: &[f64], periods: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| values.get(i + periods).copied().unwrap_or(f64::NAN))
        .collect()
}

/// Running sum. Undefined values are not skipped: once a NaN or infinity
/// enters the sum, every later row stays non-finite.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rolling_mean_warmup() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[3], 3.0);
    }

    #[test]
    fn test_rolling_std_sample() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // Sample variance 32 / 7
        assert_relative_eq!(out[7], (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_std_constant_is_zero() {
        let out = rolling_std(&[3.5; 10], 5);
        assert_eq!(out[9], 0.0);
    }

    #[test]
    fn test_flat_window_is_exact() {
        // 100.1 and 0.1 are not representable in binary; summing them drifts
        for c in [100.1, 0.1, 33.3] {
            let mean = rolling_mean(&[c; 30], 21);
            let std = rolling_std(&[c; 30], 21);
            assert!(mean[21..].iter().all(|&m| m == c), "mean drifted for {}", c);
            assert!(std[21..].iter().all(|&s| s == 0.0), "std nonzero for {}", c);
        }

        let mut window = RollingWindow::new(3);
        for v in [0.1, 0.1, 0.2] {
            window.push(v);
        }
        assert!(!window.is_flat());
        assert!(window.std_dev() > 0.0);
    }

    #[test]
    fn test_nan_in_window() {
        let out = rolling_max(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[1].is_nan() && out[2].is_nan());
        assert_eq!(out[3], 4.0);
        assert_eq!(rolling_min(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2)[4], 4.0);
    }

    #[test]
    fn test_lag_and_lead() {
        let values = [1.0, 2.0, 3.0];
        let lagged = lag(&values, 1);
        assert!(lagged[0].is_nan());
        assert_eq!(&lagged[1..], &[1.0, 2.0]);

        let led = lead(&values, 1);
        assert_eq!(&led[..2], &[2.0, 3.0]);
        assert!(led[2].is_nan());
    }

    #[test]
    fn test_cumulative_sum_poisoning() {
        let out = cumulative_sum(&[1.0, 2.0, f64::NAN, 4.0]);
        assert_eq!(&out[..2], &[1.0, 3.0]);
        assert!(out[2].is_nan() && out[3].is_nan());
    }
}
