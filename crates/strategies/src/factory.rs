// In crates/strategies/src/factory.rs

//! The parameter tables consumed by the indicator and strategy factories.

use core_types::{Symbol, Timeframe};
use registry::{Collision, Registry, Result};
use serde::Serialize;

use crate::presets::{self, indi_ac_defaults, stg_ac_defaults};
use crate::types::{IndicatorParams, StrategyParams};
use crate::validation::MethodRanges;

/// Indicator and strategy registries populated by one configuration pass.
#[derive(Debug)]
pub struct ParamSet {
    pub indicators: Registry<IndicatorParams>,
    pub strategies: Registry<StrategyParams>,
}

/// Everything a factory needs to construct one AC indicator + strategy pair.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResolvedParams {
    pub indicator: IndicatorParams,
    pub strategy: StrategyParams,
}

impl ParamSet {
    /// Empty tables whose strategy records must satisfy `ranges`.
    pub fn new(ranges: MethodRanges) -> Self {
        Self {
            indicators: Registry::new(),
            strategies: Registry::new().with_validator(ranges.validator()),
        }
    }

    /// Registers `indi_ac_defaults` and `stg_ac_defaults` under [`presets::AC`].
    pub fn register_ac_defaults(&mut self) -> Result<()> {
        self.indicators.register_defaults(presets::AC, indi_ac_defaults())?;
        self.strategies.register_defaults(presets::AC, stg_ac_defaults())?;
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.indicators.freeze();
        self.strategies.freeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.indicators.is_frozen() && self.strategies.is_frozen()
    }

    /// Overwritten registrations across both tables.
    pub fn collisions(&self) -> Vec<Collision> {
        self.indicators
            .collisions()
            .iter()
            .chain(self.strategies.collisions())
            .cloned()
            .collect()
    }

    /// Looks up both records for `name` and fills in what the caller supplies:
    /// a `Current` timeframe becomes `timeframe`, a missing symbol becomes `symbol`.
    pub fn resolve(
        &self,
        name: &str,
        timeframe: Timeframe,
        symbol: Option<&Symbol>,
    ) -> Result<ResolvedParams> {
        let mut indicator = self.indicators.lookup(name, timeframe, symbol)?.clone();
        let mut strategy = self.strategies.lookup(name, timeframe, symbol)?.clone();

        if !indicator.timeframe.is_concrete() {
            indicator.timeframe = timeframe;
        }
        if !strategy.timeframe.is_concrete() {
            strategy.timeframe = timeframe;
        }
        if strategy.symbol.is_none() {
            strategy.symbol = symbol.cloned();
        }

        tracing::debug!(
            name,
            %timeframe,
            symbol = ?symbol,
            "Resolved parameters."
        );
        Ok(ResolvedParams { indicator, strategy })
    }
}

#[cfg(test)]
mod tests {
    use registry::Error;

    use super::*;
    use crate::types::{IndicatorPatch, StrategyPatch};
    use crate::validation::SelectorRange;

    fn eurusd() -> Symbol {
        Symbol::new("EURUSD").unwrap()
    }

    fn ac_set() -> ParamSet {
        let mut set = ParamSet::new(MethodRanges::default());
        set.register_ac_defaults().unwrap();
        set
    }

    #[test]
    fn m1_override_merges_with_defaults() {
        let mut set = ac_set();
        let patch = StrategyPatch {
            signal_open_method: Some(-1),
            signal_open_filter: Some(0),
            signal_open_level: Some(10.0),
            signal_close_method: Some(1),
            signal_close_level: Some(25.0),
            price_stop_method: Some(2),
            price_stop_level: Some(1.0),
            ..Default::default()
        };
        set.strategies
            .register_override(presets::AC, Timeframe::M1, Some(eurusd()), &patch)
            .unwrap();
        set.freeze();

        let record = set
            .strategies
            .lookup(presets::AC, Timeframe::M1, Some(&eurusd()))
            .unwrap();
        let expected = StrategyParams {
            symbol: Some(eurusd()),
            timeframe: Timeframe::M1,
            lot_size: 0.0,
            signal_open_method: -1,
            signal_open_filter: 0,
            signal_open_level: 10.0,
            signal_open_boost: 0,
            signal_close_method: 1,
            signal_close_level: 25.0,
            price_stop_method: 2,
            price_stop_level: 1.0,
            tick_filter_method: 1,
            max_spread: 0.0,
        };
        assert_eq!(record, &expected);
    }

    #[test]
    fn resolve_fills_caller_timeframe_and_symbol() {
        let mut set = ac_set();
        set.freeze();

        let resolved = set.resolve(presets::AC, Timeframe::M5, Some(&eurusd())).unwrap();
        assert_eq!(resolved.indicator.timeframe, Timeframe::M5);
        assert_eq!(resolved.strategy.timeframe, Timeframe::M5);
        assert_eq!(resolved.strategy.symbol, Some(eurusd()));
        assert_eq!(resolved.strategy.price_stop_level, 2.0);
    }

    #[test]
    fn resolve_uses_indicator_override_when_present() {
        let mut set = ac_set();
        set.indicators
            .register_override(presets::AC, Timeframe::H4, None, &IndicatorPatch { shift: Some(1) })
            .unwrap();
        set.freeze();

        let resolved = set.resolve(presets::AC, Timeframe::H4, Some(&eurusd())).unwrap();
        assert_eq!(resolved.indicator.shift, 1);
        assert_eq!(resolved.indicator.timeframe, Timeframe::H4);
    }

    #[test]
    fn resolve_unknown_name_is_not_found() {
        let set = ac_set();
        let err = set.resolve("AO", Timeframe::H1, None).unwrap_err();
        assert_eq!(err, Error::NotFound { name: "AO".into() });
    }

    #[test]
    fn strategy_table_enforces_method_ranges() {
        let ranges = MethodRanges {
            signal_open_method: SelectorRange::new(-4, 4),
            ..Default::default()
        };
        let mut set = ParamSet::new(ranges);
        set.register_ac_defaults().unwrap();

        let patch = StrategyPatch {
            signal_open_method: Some(-8),
            ..Default::default()
        };
        let err = set
            .strategies
            .register_override(presets::AC, Timeframe::M15, Some(eurusd()), &patch)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "AC/M15/EURUSD: Invalid field `signal_open_method`: -8 is outside the engine range -4..=4"
        );
    }

    #[test]
    fn collisions_span_both_tables() {
        let mut set = ac_set();
        let shift = IndicatorPatch { shift: Some(0) };
        for _ in 0..2 {
            set.indicators
                .register_override(presets::AC, Timeframe::M30, Some(eurusd()), &shift)
                .unwrap();
            set.strategies
                .register_override(presets::AC, Timeframe::M30, Some(eurusd()), &StrategyPatch::default())
                .unwrap();
        }
        let kinds: Vec<&str> = set.collisions().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec!["indicator", "strategy"]);
    }
}
