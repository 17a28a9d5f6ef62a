// In crates/strategies/src/presets.rs

//! Base defaults for the AC indicator and strategy.

use core_types::Timeframe;

use crate::types::{IndicatorParams, StrategyParams};

/// Registry name of the Accelerator Oscillator indicator and strategy.
pub const AC: &str = "AC";

/// Indicator defaults: follow the caller's chart period, read the current bar.
pub fn indi_ac_defaults() -> IndicatorParams {
    IndicatorParams {
        timeframe: Timeframe::Current,
        shift: 0,
    }
}

pub fn stg_ac_defaults() -> StrategyParams {
    StrategyParams {
        symbol: None,
        timeframe: Timeframe::Current,
        lot_size: 0.0,
        signal_open_method: 0,
        signal_open_filter: 1,
        signal_open_level: 0.0,
        signal_open_boost: 0,
        signal_close_method: 0,
        signal_close_level: 0.0,
        price_stop_method: 0,
        price_stop_level: 2.0,
        tick_filter_method: 1,
        max_spread: 0.0,
    }
}
