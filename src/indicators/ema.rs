//! Exponential moving average parameterized by center of mass

/// Exponential Moving Average (EMA)
///
/// Uses the bias-adjusted form: each output is the weighted mean of every
/// observation so far, with weights `(1 - alpha)^k` for the value `k` rows
/// back and `alpha = 1 / (1 + com)`. There is no warm-up window; the first
/// defined input is returned as-is. Undefined inputs still decay the weights
/// of earlier observations and repeat the previous output.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    decay: f64,
    weighted: f64,
    old_weight: f64,
}

impl ExponentialMovingAverage {
    /// Create new EMA with given center of mass
    pub fn from_com(com: f64) -> Self {
        if !(com >= 0.0) {
            panic!("Center of mass must be non-negative");
        }
        let alpha = 1.0 / (1.0 + com);
        Self {
            decay: 1.0 - alpha,
            weighted: f64::NAN,
            old_weight: 1.0,
        }
    }

    /// Create new EMA with given span, `com = (span - 1) / 2`
    pub fn from_span(span: usize) -> Self {
        if span == 0 {
            panic!("Span must be greater than 0");
        }
        Self::from_com((span as f64 - 1.0) / 2.0)
    }

    /// Update with new value
    pub fn update(&mut self, value: f64) -> f64 {
        let is_observation = !value.is_nan();

        if self.weighted.is_nan() {
            if is_observation {
                self.weighted = value;
            }
            return self.weighted;
        }

        self.old_weight *= self.decay;
        if is_observation {
            if self.weighted != value {
                self.weighted =
                    (self.old_weight * self.weighted + value) / (self.old_weight + 1.0);
            }
            self.old_weight += 1.0;
        }

        self.weighted
    }

    /// Compute EMA with given span for a slice of values
    pub fn compute(span: usize, values: &[f64]) -> Vec<f64> {
        let mut ema = Self::from_span(span);
        values.iter().map(|&v| ema.update(v)).collect()
    }

    /// Get current EMA value
    pub fn current(&self) -> Option<f64> {
        (!self.weighted.is_nan()).then_some(self.weighted)
    }
}
