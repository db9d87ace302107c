//! Trend indicators: MACD, moving-average spread and Parabolic SAR

use crate::error::{FeatureError, Result};
use crate::indicators::ema::ExponentialMovingAverage;
use crate::indicators::rolling::rolling_mean;

/// MACD line, signal line and their difference
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub diff: Vec<f64>,
}

/// Moving Average Convergence/Divergence over closes.
///
/// EMAs start at the first close with no warm-up, so early rows are defined
/// but unstable.
pub fn macd(close: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ExponentialMovingAverage::compute(fast, close);
    let ema_slow = ExponentialMovingAverage::compute(slow, close);

    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal = ExponentialMovingAverage::compute(signal, &line);
    let diff = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries { line, signal, diff }
}

/// Short and long simple moving averages and their spread
#[derive(Debug, Clone)]
pub struct MovingAverageSpread {
    pub short: Vec<f64>,
    pub long: Vec<f64>,
    pub spread: Vec<f64>,
}

pub fn moving_average_spread(close: &[f64], short: usize, long: usize) -> MovingAverageSpread {
    let short = rolling_mean(close, short);
    let long = rolling_mean(close, long);
    let spread = short.iter().zip(&long).map(|(s, l)| s - l).collect();
    MovingAverageSpread {
        short,
        long,
        spread,
    }
}

/// Acceleration schedule for the Parabolic SAR
#[derive(Debug, Clone, Copy)]
pub struct SarAcceleration {
    pub start: f64,
    pub step: f64,
    pub max: f64,
}

impl Default for SarAcceleration {
    fn default() -> Self {
        Self {
            start: 0.02,
            step: 0.02,
            max: 0.2,
        }
    }
}

/// Parabolic Stop-And-Reverse state machine.
///
/// Trend extremes and reseeds are taken from closes, not highs/lows; highs
/// and lows only decide when the trend reverses. The acceleration factor is
/// never reset on reversal.
#[derive(Debug, Clone)]
pub struct ParabolicSar {
    uptrend: bool,
    prior_sar: f64,
    extreme_point: f64,
    acceleration: f64,
    accel: SarAcceleration,
}

impl ParabolicSar {
    /// Seed a downtrend from the opening closes: the stop starts at their
    /// maximum and the extreme point at their minimum.
    pub fn seed(seed_closes: &[f64], accel: SarAcceleration) -> Result<Self> {
        if seed_closes.is_empty() {
            return Err(FeatureError::insufficient("sar", 1, 0));
        }
        let mut sar = Self {
            uptrend: false,
            prior_sar: f64::NAN,
            extreme_point: f64::NAN,
            acceleration: accel.start,
            accel,
        };
        sar.reseed(seed_closes);
        Ok(sar)
    }

    fn reseed(&mut self, closes: &[f64]) {
        let highest = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = closes.iter().copied().fold(f64::INFINITY, f64::min);
        if self.uptrend {
            self.prior_sar = lowest;
            self.extreme_point = highest;
        } else {
            self.prior_sar = highest;
            self.extreme_point = lowest;
        }
    }

    fn accelerate(&mut self) {
        self.acceleration = self.accel.max.min(self.acceleration + self.accel.step);
    }

    /// Advance one row and return its SAR.
    ///
    /// `window` is the closes from `step` rows back up to and including the
    /// current row; on a reversal the new extreme point is reseeded from it.
    /// The stop carried into the next row is always this row's SAR.
    pub fn update(&mut self, high: f64, low: f64, close: f64, window: &[f64]) -> f64 {
        let sar;
        if self.uptrend {
            sar = self.prior_sar + self.acceleration * (self.extreme_point - self.prior_sar);
            if low < sar {
                self.uptrend = false;
                self.reseed(window);
            } else if close > self.extreme_point {
                self.extreme_point = close;
                self.accelerate();
            }
        } else {
            sar = self.prior_sar - self.acceleration * (self.prior_sar - self.extreme_point);
            if high > sar {
                self.uptrend = true;
                self.reseed(window);
            } else if close < self.extreme_point {
                self.extreme_point = close;
                self.accelerate();
            }
        }

        self.prior_sar = sar;
        sar
    }

    pub fn is_uptrend(&self) -> bool {
        self.uptrend
    }

    pub fn extreme_point(&self) -> f64 {
        self.extreme_point
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn prior_sar(&self) -> f64 {
        self.prior_sar
    }
}

/// Parabolic SAR over a full series. Rows before `step` are undefined.
///
/// Fails when fewer than `step` rows exist since there is nothing to seed from.
pub fn parabolic_sar(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    step: usize,
    accel: SarAcceleration,
) -> Result<Vec<f64>> {
    let n = close.len();
    if step == 0 || n < step {
        return Err(FeatureError::insufficient("sar", step.max(1), n));
    }

    let mut state = ParabolicSar::seed(&close[..step], accel)?;
    let mut out = vec![f64::NAN; n];
    for i in step..n {
        out[i] = state.update(high[i], low[i], close[i], &close[i - step..=i]);
    }

    Ok(out)
}
