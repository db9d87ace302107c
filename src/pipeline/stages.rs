//! Return, shared price-change and target stages

use crate::error::{FeatureError, Result};
use crate::indicators::rolling::{lag, lead};
use crate::pipeline::stage::{names, RowTrim, Stage, StageKind, StageOutput};
use crate::table::FeatureTable;

pub const RETURN: &str = "return";
pub const DOLLAR_PNL: &str = "dollar_pnl";
pub const TARGET: &str = "y";

/// Close-to-close return and intraday close ratios.
///
/// The first row has no prior close and is dropped rather than filled.
#[derive(Debug, Clone, Default)]
pub struct ReturnStage;

impl Stage for ReturnStage {
    fn name(&self) -> &str {
        "returns"
    }

    fn kind(&self) -> StageKind {
        StageKind::Reshape
    }

    fn requires(&self) -> Vec<String> {
        names(&["open", "high", "low", "close"])
    }

    fn produces(&self) -> Vec<String> {
        names(&[RETURN, "close_to_open", "close_to_high", "close_to_low"])
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        if table.len() < 2 {
            return Err(FeatureError::insufficient(self.name(), 2, table.len()));
        }

        let close = table.column("close")?;
        let ratio = |other: &[f64]| -> Vec<f64> {
            close.iter().zip(other).map(|(c, o)| c / o).collect()
        };

        let returns = close
            .iter()
            .zip(lag(close, 1))
            .map(|(c, prev)| c / prev)
            .collect();

        Ok(StageOutput::new()
            .with(RETURN, returns)
            .with("close_to_open", ratio(table.column("open")?))
            .with("close_to_high", ratio(table.column("high")?))
            .with("close_to_low", ratio(table.column("low")?))
            .trimmed(RowTrim::Leading(1)))
    }
}

/// One-row price change `close[i-1] - close[i]`, shared by RSI and OBV.
///
/// Positive when the price fell. The first row is undefined.
#[derive(Debug, Clone, Default)]
pub struct PriceChangeStage;

impl Stage for PriceChangeStage {
    fn name(&self) -> &str {
        "price_change"
    }

    fn requires(&self) -> Vec<String> {
        names(&["close"])
    }

    fn produces(&self) -> Vec<String> {
        names(&[DOLLAR_PNL])
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let close = table.column("close")?;
        let change = lag(close, 1)
            .iter()
            .zip(close)
            .map(|(prev, c)| prev - c)
            .collect();
        Ok(StageOutput::new().with(DOLLAR_PNL, change))
    }
}

/// Supervised label: the next row's return.
///
/// Acausal by one row. The last row has no label and is dropped.
#[derive(Debug, Clone, Default)]
pub struct TargetStage;

impl Stage for TargetStage {
    fn name(&self) -> &str {
        "target"
    }

    fn kind(&self) -> StageKind {
        StageKind::Label
    }

    fn requires(&self) -> Vec<String> {
        names(&[RETURN])
    }

    fn produces(&self) -> Vec<String> {
        names(&[TARGET])
    }

    fn compute(&self, table: &FeatureTable) -> Result<StageOutput> {
        let label = lead(table.column(RETURN)?, 1);
        Ok(StageOutput::new()
            .with(TARGET, label)
            .trimmed(RowTrim::Trailing(1)))
    }
}
