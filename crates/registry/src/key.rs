// In crates/registry/src/key.rs

use std::fmt;

use core_types::{Symbol, Timeframe};

/// Identifies one parameter record: a name (e.g. "AC"), a period and an
/// optional symbol. A `None` symbol is the wildcard that matches any
/// instrument; a `Current` timeframe addresses the base default itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKey {
    pub name: String,
    pub timeframe: Timeframe,
    pub symbol: Option<Symbol>,
}

impl ParamKey {
    pub fn new(name: impl Into<String>, timeframe: Timeframe, symbol: Option<Symbol>) -> Self {
        Self {
            name: name.into(),
            timeframe,
            symbol,
        }
    }

    pub fn defaults(name: impl Into<String>) -> Self {
        Self::new(name, Timeframe::Current, None)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{}/{}/{}", self.name, self.timeframe, symbol),
            None => write!(f, "{}/{}/*", self.name, self.timeframe),
        }
    }
}

/// An override registration that replaced an earlier one for the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub kind: &'static str,
    pub key: ParamKey,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.key)
    }
}
