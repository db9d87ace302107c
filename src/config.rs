//! Feature engine configuration

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};

fn default_volatility_windows() -> Vec<usize> {
    vec![5, 21, 60]
}

/// Every tunable parameter of the feature pipeline.
///
/// Defaults reproduce the standard column set (`macd_9_day`, `ma_50_200`,
/// `21d_volatility`, ...). Column names are derived from these values, so
/// changing a window also changes the name of its column.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub sar_step: usize,
    pub sar_acceleration: f64,
    pub sar_acceleration_step: f64,
    pub sar_acceleration_max: f64,
    pub stochastic_window: usize,
    pub cci_window: usize,
    pub cci_scale: f64,
    pub rsi_period: usize,
    pub volatility_windows: Vec<usize>,
    pub bollinger_window: usize,
    pub bollinger_width: f64,
    pub atr_window: usize,
    pub volume_lookback: usize,
    pub chaikin_fast: usize,
    pub chaikin_slow: usize,
    /// Run independent stages on the rayon pool
    pub parallel: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ma_short: 50,
            ma_long: 200,
            sar_step: 5,
            sar_acceleration: 0.02,
            sar_acceleration_step: 0.02,
            sar_acceleration_max: 0.2,
            stochastic_window: 14,
            cci_window: 20,
            cci_scale: 0.15,
            rsi_period: 14,
            volatility_windows: default_volatility_windows(),
            bollinger_window: 21,
            bollinger_width: 2.0,
            atr_window: 14,
            volume_lookback: 21,
            chaikin_fast: 3,
            chaikin_slow: 10,
            parallel: true,
        }
    }
}

impl FeatureConfig {
    /// Check parameters for values no indicator can work with
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ma_short", self.ma_short),
            ("ma_long", self.ma_long),
            ("sar_step", self.sar_step),
            ("stochastic_window", self.stochastic_window),
            ("cci_window", self.cci_window),
            ("rsi_period", self.rsi_period),
            ("bollinger_window", self.bollinger_window),
            ("atr_window", self.atr_window),
            ("volume_lookback", self.volume_lookback),
            ("chaikin_fast", self.chaikin_fast),
            ("chaikin_slow", self.chaikin_slow),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(FeatureError::Config(format!("{} must be greater than 0", name)));
            }
        }

        if self.volatility_windows.iter().any(|&w| w == 0) {
            return Err(FeatureError::Config(
                "volatility_windows must all be greater than 0".to_string(),
            ));
        }

        let mut unique = self.volatility_windows.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != self.volatility_windows.len() {
            return Err(FeatureError::Config(
                "volatility_windows contains duplicates".to_string(),
            ));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(FeatureError::Config(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.ma_short == self.ma_long || self.chaikin_fast == self.chaikin_slow {
            return Err(FeatureError::Config(
                "short and long windows must differ".to_string(),
            ));
        }

        if !(self.sar_acceleration > 0.0 && self.sar_acceleration_step >= 0.0) {
            return Err(FeatureError::Config(
                "SAR acceleration must be positive".to_string(),
            ));
        }

        if self.sar_acceleration_max < self.sar_acceleration {
            return Err(FeatureError::Config(format!(
                "sar_acceleration_max ({}) is below the starting acceleration ({})",
                self.sar_acceleration_max, self.sar_acceleration
            )));
        }

        if !(self.cci_scale > 0.0 && self.bollinger_width > 0.0) {
            return Err(FeatureError::Config(
                "cci_scale and bollinger_width must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn ma_short_column(&self) -> String {
        format!("ma_{}_day", self.ma_short)
    }

    pub fn ma_long_column(&self) -> String {
        format!("ma_{}_day", self.ma_long)
    }

    pub fn ma_spread_column(&self) -> String {
        format!("ma_{}_{}", self.ma_short, self.ma_long)
    }

    pub fn macd_signal_column(&self) -> String {
        format!("macd_{}_day", self.macd_signal)
    }

    pub fn volatility_column(window: usize) -> String {
        format!("{}d_volatility", window)
    }
}
