//! Indicator math over plain column slices
//!
//! Every function here takes whole columns and returns a column of the same
//! length. Undefined cells are `NaN` (or infinite where a division by zero
//! produced them) and are never filtered out.

pub mod ema;
pub mod momentum;
pub mod rolling;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use ema::ExponentialMovingAverage;
pub use momentum::{commodity_channel_index, rsi, stochastic_oscillator, WilderRsi};
pub use rolling::RollingWindow;
pub use trend::{macd, moving_average_spread, parabolic_sar, ParabolicSar, SarAcceleration};
pub use volatility::{average_true_range, bollinger, return_volatility, true_range};
pub use volume::{accumulation_distribution, chaikin_oscillator, on_balance_volume, volume_ratio};
