// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A trading instrument identifier, e.g. `EURUSD`.
///
/// Symbols are stored upper-cased so that `eurusd` and `EURUSD` address the
/// same parameter records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::EmptySymbol);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Symbol::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bar aggregation period.
///
/// `Current` stands for "whatever period the caller's chart runs on". It is
/// only meaningful inside base default records; concrete overrides always
/// name one of the fixed periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Timeframe {
    #[default]
    Current,
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    H8,
    D1,
    W1,
    MN1,
}

impl Timeframe {
    /// Every concrete period, shortest first.
    pub const CONCRETE: [Timeframe; 10] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::H8,
        Timeframe::D1,
        Timeframe::W1,
        Timeframe::MN1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Current => "CURRENT",
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::H8 => "H8",
            Timeframe::D1 => "D1",
            Timeframe::W1 => "W1",
            Timeframe::MN1 => "MN1",
        }
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, Timeframe::Current)
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    /// Accepts `M1`, `m1` and the terminal-style `PERIOD_M1` spellings.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("PERIOD_").unwrap_or(&upper);
        if name == Timeframe::Current.as_str() {
            return Ok(Timeframe::Current);
        }
        Timeframe::CONCRETE
            .into_iter()
            .find(|tf| tf.as_str() == name)
            .ok_or_else(|| Error::UnknownTimeframe(s.to_string()))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_accepts_terminal_spelling() {
        assert_eq!("PERIOD_H4".parse::<Timeframe>().unwrap(), Timeframe::H4);
        assert_eq!("m15".parse::<Timeframe>().unwrap(), Timeframe::M15);
        assert_eq!("period_current".parse::<Timeframe>().unwrap(), Timeframe::Current);
    }

    #[test]
    fn timeframe_rejects_unknown_period() {
        let err = "H2".parse::<Timeframe>().unwrap_err();
        assert_eq!(err, Error::UnknownTimeframe("H2".to_string()));
    }

    #[test]
    fn timeframe_serializes_as_plain_string() {
        let json = serde_json::to_string(&Timeframe::M30).unwrap();
        assert_eq!(json, "\"M30\"");
        let back: Timeframe = serde_json::from_str("\"PERIOD_H8\"").unwrap();
        assert_eq!(back, Timeframe::H8);
    }

    #[test]
    fn concrete_periods_are_ordered_by_length() {
        assert!(Timeframe::CONCRETE.windows(2).all(|w| w[0] < w[1]));
        assert!(Timeframe::CONCRETE.iter().all(Timeframe::is_concrete));
        assert!(!Timeframe::Current.is_concrete());
    }

    #[test]
    fn symbol_is_normalized() {
        let symbol = Symbol::new("  eurusd ").unwrap();
        assert_eq!(symbol.as_str(), "EURUSD");
        assert_eq!(Symbol::new("   "), Err(Error::EmptySymbol));
    }

    #[test]
    fn symbol_deserializes_through_validation() {
        let symbol: Symbol = serde_json::from_str("\"gbpusd\"").unwrap();
        assert_eq!(symbol, Symbol("GBPUSD".to_string()));
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
