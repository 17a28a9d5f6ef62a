// In crates/strategies/src/types.rs

use core_types::{Symbol, Timeframe};
use registry::{Error, Record, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the AC indicator for one period.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndicatorParams {
    pub timeframe: Timeframe,
    /// Bar offset used when reading the indicator's history. 0 is the current bar.
    pub shift: u32,
}

/// Fields an indicator override may replace.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndicatorPatch {
    pub shift: Option<u32>,
}

impl Record for IndicatorParams {
    type Patch = IndicatorPatch;
    const KIND: &'static str = "indicator";

    fn apply(&mut self, patch: &IndicatorPatch) {
        if let Some(shift) = patch.shift {
            self.shift = shift;
        }
    }

    fn bind(&mut self, timeframe: Timeframe, _symbol: Option<&Symbol>) {
        self.timeframe = timeframe;
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Trading parameters of the AC strategy for one (symbol, period).
///
/// Method selectors are opaque integer codes owned by the strategy engine;
/// a negative selector reverses the direction of the rule it picks. Zero
/// disables filters, boosts and the spread limit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StrategyParams {
    /// `None` means the record applies to whatever symbol the caller trades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    pub timeframe: Timeframe,
    /// Volume multiplier. 0 uses the framework's own sizing.
    pub lot_size: f64,
    pub signal_open_method: i32,
    pub signal_open_filter: i32,
    pub signal_open_level: f64,
    pub signal_open_boost: i32,
    pub signal_close_method: i32,
    pub signal_close_level: f64,
    pub price_stop_method: i32,
    pub price_stop_level: f64,
    pub tick_filter_method: i32,
    /// Maximum spread allowed on entry. 0 leaves the limit to the framework.
    pub max_spread: f64,
}

/// Fields a strategy override may replace. Absent fields keep the default.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StrategyPatch {
    pub lot_size: Option<f64>,
    pub signal_open_method: Option<i32>,
    pub signal_open_filter: Option<i32>,
    pub signal_open_level: Option<f64>,
    pub signal_open_boost: Option<i32>,
    pub signal_close_method: Option<i32>,
    pub signal_close_level: Option<f64>,
    pub price_stop_method: Option<i32>,
    pub price_stop_level: Option<f64>,
    pub tick_filter_method: Option<i32>,
    pub max_spread: Option<f64>,
}

impl Record for StrategyParams {
    type Patch = StrategyPatch;
    const KIND: &'static str = "strategy";

    fn apply(&mut self, patch: &StrategyPatch) {
        fn set<T: Copy>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }

        set(&mut self.lot_size, patch.lot_size);
        set(&mut self.signal_open_method, patch.signal_open_method);
        set(&mut self.signal_open_filter, patch.signal_open_filter);
        set(&mut self.signal_open_level, patch.signal_open_level);
        set(&mut self.signal_open_boost, patch.signal_open_boost);
        set(&mut self.signal_close_method, patch.signal_close_method);
        set(&mut self.signal_close_level, patch.signal_close_level);
        set(&mut self.price_stop_method, patch.price_stop_method);
        set(&mut self.price_stop_level, patch.price_stop_level);
        set(&mut self.tick_filter_method, patch.tick_filter_method);
        set(&mut self.max_spread, patch.max_spread);
    }

    fn bind(&mut self, timeframe: Timeframe, symbol: Option<&Symbol>) {
        self.timeframe = timeframe;
        self.symbol = symbol.cloned();
    }

    fn check(&self) -> Result<()> {
        let levels = [
            ("lot_size", self.lot_size),
            ("signal_open_level", self.signal_open_level),
            ("signal_close_level", self.signal_close_level),
            ("price_stop_level", self.price_stop_level),
            ("max_spread", self.max_spread),
        ];
        for (field, value) in levels {
            if !value.is_finite() {
                return Err(Error::invalid_field(field, format!("{value} is not a finite number")));
            }
        }

        let non_negative = [
            ("lot_size", self.lot_size),
            ("price_stop_level", self.price_stop_level),
            ("max_spread", self.max_spread),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(Error::invalid_field(field, format!("{value} must be >= 0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{indi_ac_defaults, stg_ac_defaults};

    #[test]
    fn max_spread_must_not_be_negative() {
        let mut params = stg_ac_defaults();
        params.max_spread = 0.0;
        assert!(params.check().is_ok());

        params.max_spread = -0.5;
        let err = params.check().unwrap_err();
        assert_eq!(err, Error::invalid_field("max_spread", "-0.5 must be >= 0"));
    }

    #[test]
    fn levels_must_be_finite() {
        let mut params = stg_ac_defaults();
        params.signal_open_level = f64::NAN;
        assert!(matches!(
            params.check(),
            Err(Error::InvalidField { ref field, .. }) if field == "signal_open_level"
        ));
    }

    #[test]
    fn negative_signal_levels_are_allowed() {
        let mut params = stg_ac_defaults();
        params.signal_open_level = -3.0;
        params.signal_close_level = -25.0;
        assert!(params.check().is_ok());
    }

    #[test]
    fn patch_replaces_only_named_fields() {
        let mut params = stg_ac_defaults();
        let patch = StrategyPatch {
            signal_open_method: Some(-4),
            signal_open_boost: Some(1),
            ..Default::default()
        };
        params.apply(&patch);

        let mut expected = stg_ac_defaults();
        expected.signal_open_method = -4;
        expected.signal_open_boost = 1;
        assert_eq!(params, expected);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = toml::from_str::<StrategyPatch>("signal_open_mthod = 1").unwrap_err();
        assert!(err.to_string().contains("signal_open_mthod"));
    }

    #[test]
    fn indicator_bind_keeps_shift() {
        let mut params = indi_ac_defaults();
        params.apply(&IndicatorPatch { shift: Some(2) });
        params.bind(Timeframe::H8, None);
        assert_eq!(
            params,
            IndicatorParams {
                timeframe: Timeframe::H8,
                shift: 2
            }
        );
    }
}
