//! The four independent indicator groups
//!
//! Each group reads base columns (plus `return` or `dollar_pnl` where noted)
//! and writes its own disjoint set of columns, so the pipeline is free to run
//! them concurrently over the same table.

use crate::config::FeatureConfig;
use crate::error::Result;
use crate::indicators::{
    average_true_range, bollinger, chaikin_oscillator, commodity_channel_index, macd,
    moving_average_spread, on_balance_volume, parabolic_sar, return_volatility, rsi,
    stochastic_oscillator, volume_ratio, SarAcceleration,
};
use crate::pipeline::stage::{names, Stage, StageOutput};
use crate::pipeline::stages::{DOLLAR_PNL, RETURN};
use crate::table::FeatureTable;

/// MACD, moving-average spread and Parabolic SAR
#[derive(Debug, Clone)]
pub struct TrendGroup {
    config: FeatureConfig,
}

impl TrendGroup {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    fn acceleration(&self) -> SarAcceleration {
        SarAcceleration {
            start: self.config.sar_acceleration,
            step: self.config.sar_acceleration_step,
            max: self.config.sar_acceleration_max,
        }
    }
}

impl Stage for TrendGroup {
    fn name(&self) -> &str {
        "trend"
    }

    fn requires(&self) -> Vec<String> {
        names(&["high", "low", "close"])
    }

    fn produces(&self) -> Vec<String> {
        vec![
            "macd_line".to_string(),
            self.config.macd_signal_column(),
            "macd_diff".to_string(),
            self.config.ma_short_column(),
            self.config.ma_long_column(),
            self.config.ma_spread_column(),
            "sar".to_string(),
        ]
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let close = table.column("close")?;
        let c = &self.config;

        let sar = parabolic_sar(
            table.column("high")?,
            table.column("low")?,
            close,
            c.sar_step,
            self.acceleration(),
        )?;
        let macd = macd(close, c.macd_fast, c.macd_slow, c.macd_signal);
        let ma = moving_average_spread(close, c.ma_short, c.ma_long);

        Ok(StageOutput::new()
            .with("macd_line", macd.line)
            .with(c.macd_signal_column(), macd.signal)
            .with("macd_diff", macd.diff)
            .with(c.ma_short_column(), ma.short)
            .with(c.ma_long_column(), ma.long)
            .with(c.ma_spread_column(), ma.spread)
            .with("sar", sar))
    }
}

/// Stochastic Oscillator, CCI and RSI
#[derive(Debug, Clone)]
pub struct MomentumGroup {
    config: FeatureConfig,
}

impl MomentumGroup {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }
}

impl Stage for MomentumGroup {
    fn name(&self) -> &str {
        "momentum"
    }

    fn requires(&self) -> Vec<String> {
        names(&["high", "low", "close", DOLLAR_PNL])
    }

    fn produces(&self) -> Vec<String> {
        names(&["stochastic_oscillator", "cci", "rsi"])
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let high = table.column("high")?;
        let low = table.column("low")?;
        let close = table.column("close")?;
        let c = &self.config;

        let rsi = rsi(table.column(DOLLAR_PNL)?, c.rsi_period)?;

        let typical_price: Vec<f64> = high
            .iter()
            .zip(low)
            .zip(close)
            .map(|((h, l), c)| (h + l + c) / 3.0)
            .collect();

        Ok(StageOutput::new()
            .with(
                "stochastic_oscillator",
                stochastic_oscillator(close, c.stochastic_window),
            )
            .with(
                "cci",
                commodity_channel_index(&typical_price, c.cci_window, c.cci_scale),
            )
            .with("rsi", rsi))
    }
}

/// Return volatility, Bollinger measure and ATR
#[derive(Debug, Clone)]
pub struct VolatilityGroup {
    config: FeatureConfig,
}

impl VolatilityGroup {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }
}

impl Stage for VolatilityGroup {
    fn name(&self) -> &str {
        "volatility"
    }

    fn requires(&self) -> Vec<String> {
        names(&["high", "low", "close", RETURN])
    }

    fn produces(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .config
            .volatility_windows
            .iter()
            .map(|&w| FeatureConfig::volatility_column(w))
            .collect();
        out.extend(names(&["bollinger", "atr"]));
        out
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let returns = table.column(RETURN)?;
        let close = table.column("close")?;
        let c = &self.config;

        let mut output = StageOutput::new();
        for &window in &c.volatility_windows {
            output = output.with(
                FeatureConfig::volatility_column(window),
                return_volatility(returns, window),
            );
        }

        Ok(output
            .with(
                "bollinger",
                bollinger(close, c.bollinger_window, c.bollinger_width),
            )
            .with(
                "atr",
                average_true_range(table.column("high")?, table.column("low")?, close, c.atr_window),
            ))
    }
}

/// Volume ratio, On-Balance Volume and Chaikin Oscillator
#[derive(Debug, Clone)]
pub struct VolumeGroup {
    config: FeatureConfig,
}

impl VolumeGroup {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }
}

impl Stage for VolumeGroup {
    fn name(&self) -> &str {
        "volume"
    }

    fn requires(&self) -> Vec<String> {
        names(&["high", "low", "close", "volume", DOLLAR_PNL])
    }

    fn produces(&self) -> Vec<String> {
        names(&["volume_rolling", "on_balance_volume", "chaikin_oscillator"])
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let volume = table.column("volume")?;
        let c = &self.config;

        Ok(StageOutput::new()
            .with("volume_rolling", volume_ratio(volume, c.volume_lookback))
            .with(
                "on_balance_volume",
                on_balance_volume(volume, table.column(DOLLAR_PNL)?),
            )
            .with(
                "chaikin_oscillator",
                chaikin_oscillator(
                    table.column("high")?,
                    table.column("low")?,
                    table.column("close")?,
                    volume,
                    c.chaikin_fast,
                    c.chaikin_slow,
                ),
            ))
    }
}
