// In crates/strategies/src/validation.rs

use registry::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::types::StrategyParams;

/// Inclusive range of selector codes the strategy engine understands.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRange {
    pub min: i32,
    pub max: i32,
}

impl SelectorRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for SelectorRange {
    /// Unbounded: the engine accepts any code.
    fn default() -> Self {
        Self::new(i32::MIN, i32::MAX)
    }
}

/// Legal selector ranges supplied by the strategy engine at configuration time.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodRanges {
    #[serde(default)]
    pub signal_open_method: SelectorRange,
    #[serde(default)]
    pub signal_close_method: SelectorRange,
    #[serde(default)]
    pub price_stop_method: SelectorRange,
    #[serde(default)]
    pub tick_filter_method: SelectorRange,
}

impl MethodRanges {
    /// Rejects ranges whose lower bound is above the upper bound.
    pub fn ensure_consistent(&self) -> Result<()> {
        for (field, range) in self.ranges() {
            if range.min > range.max {
                return Err(Error::invalid_field(
                    format!("validation.{field}"),
                    format!("min {} is greater than max {}", range.min, range.max),
                ));
            }
        }
        Ok(())
    }

    /// Checks every selector of `params` against its range.
    pub fn check(&self, params: &StrategyParams) -> Result<()> {
        let values = [
            params.signal_open_method,
            params.signal_close_method,
            params.price_stop_method,
            params.tick_filter_method,
        ];
        for ((field, range), value) in self.ranges().into_iter().zip(values) {
            if !range.contains(value) {
                return Err(Error::invalid_field(
                    field,
                    format!("{value} is outside the engine range {}..={}", range.min, range.max),
                ));
            }
        }
        Ok(())
    }

    /// The registry validator enforcing these ranges.
    pub fn validator(self) -> impl Fn(&StrategyParams) -> Result<()> + Send + Sync + 'static {
        move |params: &StrategyParams| self.check(params)
    }

    fn ranges(&self) -> [(&'static str, SelectorRange); 4] {
        [
            ("signal_open_method", self.signal_open_method),
            ("signal_close_method", self.signal_close_method),
            ("price_stop_method", self.price_stop_method),
            ("tick_filter_method", self.tick_filter_method),
        ]
    }
}
