// In crates/strategies/src/lib.rs

//! Parameter records for the Accelerator Oscillator (AC) indicator and its
//! strategy, and the pair of registries the indicator and strategy factories
//! read them from.

pub mod factory;
pub mod presets;
pub mod types;
pub mod validation;

pub use factory::{ParamSet, ResolvedParams};
pub use types::{IndicatorParams, IndicatorPatch, StrategyParams, StrategyPatch};
pub use validation::{MethodRanges, SelectorRange};
