// In crates/registry/src/registry.rs

use std::collections::BTreeMap;
use std::fmt;

use core_types::{Symbol, Timeframe};

use crate::error::{Error, Result};
use crate::key::{Collision, ParamKey};
use crate::Record;

/// Host-supplied validation hook, e.g. the legal method-selector ranges of
/// the strategy engine. Runs after the record's own [`Record::check`].
pub type Validator<R> = Box<dyn Fn(&R) -> Result<()> + Send + Sync>;

type Slot = (Timeframe, Option<Symbol>);

#[derive(Debug)]
struct Entry<R> {
    base: R,
    overrides: BTreeMap<Slot, R>,
}

/// A table of default parameter records keyed by (name, timeframe, symbol).
///
/// The registry has two phases. While open it accepts `register_defaults`
/// and `register_override`; after [`Registry::freeze`] every write fails
/// with [`Error::Frozen`] and the table is a plain immutable value that can
/// be shared behind an `Arc` with any number of readers.
pub struct Registry<R: Record> {
    entries: BTreeMap<String, Entry<R>>,
    validator: Option<Validator<R>>,
    collisions: Vec<Collision>,
    frozen: bool,
}

impl<R: Record> Default for Registry<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            validator: None,
            collisions: Vec::new(),
            frozen: false,
        }
    }
}

impl<R: Record> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &R::KIND)
            .field("entries", &self.entries)
            .field("has_validator", &self.validator.is_some())
            .field("collisions", &self.collisions)
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl<R: Record> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the host validator. Records registered afterwards must pass it.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&R) -> Result<()> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Registers the fallback record for `name`.
    pub fn register_defaults(&mut self, name: &str, base: R) -> Result<()> {
        self.ensure_open("register defaults for", name)?;
        let key = ParamKey::defaults(name);
        if name.trim().is_empty() {
            return Err(Error::invalid_field("name", "must not be empty").at(&key));
        }
        if self.entries.contains_key(name) {
            return Err(Error::DuplicateDefault {
                name: name.to_string(),
            });
        }
        self.validate(&base).map_err(|e| e.at(&key))?;

        tracing::debug!(kind = R::KIND, %key, "Registered defaults.");
        self.entries.insert(
            name.to_string(),
            Entry {
                base,
                overrides: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Builds a record from the defaults of `name` with `patch` applied and
    /// stores it under (name, timeframe, symbol). A `None` symbol registers a
    /// wildcard override for every instrument.
    ///
    /// A second registration for the same key replaces the first one. The
    /// replacement is logged as a warning and recorded in [`Registry::collisions`].
    pub fn register_override(
        &mut self,
        name: &str,
        timeframe: Timeframe,
        symbol: Option<Symbol>,
        patch: &R::Patch,
    ) -> Result<()> {
        self.ensure_open("override", name)?;
        let key = ParamKey::new(name, timeframe, symbol);
        if !timeframe.is_concrete() {
            return Err(Error::invalid_field(
                "timeframe",
                "overrides must name a concrete period",
            )
            .at(&key));
        }

        let base = match self.entries.get(name) {
            Some(entry) => &entry.base,
            None => {
                return Err(Error::UnknownBase {
                    name: name.to_string(),
                });
            }
        };
        let mut record = base.clone();
        record.apply(patch);
        record.bind(timeframe, key.symbol.as_ref());
        self.validate(&record).map_err(|e| e.at(&key))?;

        let slot = (timeframe, key.symbol.clone());
        let replaced = self
            .entries
            .get_mut(name)
            .map(|entry| entry.overrides.insert(slot, record).is_some())
            .unwrap_or(false);

        if replaced {
            tracing::warn!(
                kind = R::KIND,
                %key,
                "Override replaced an earlier registration for the same key; the last one wins."
            );
            self.collisions.push(Collision { kind: R::KIND, key });
        } else {
            tracing::debug!(kind = R::KIND, %key, "Registered override.");
        }
        Ok(())
    }

    /// Returns the most specific record for the key: the exact symbol match,
    /// then the wildcard-symbol override for the timeframe, then the defaults.
    pub fn lookup(&self, name: &str, timeframe: Timeframe, symbol: Option<&Symbol>) -> Result<&R> {
        let entry = self.entries.get(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })?;

        if let Some(symbol) = symbol {
            if let Some(record) = entry.overrides.get(&(timeframe, Some(symbol.clone()))) {
                return Ok(record);
            }
        }
        Ok(entry
            .overrides
            .get(&(timeframe, None))
            .unwrap_or(&entry.base))
    }

    /// Runs the record's own constraints and then the host validator, if any.
    pub fn validate(&self, record: &R) -> Result<()> {
        record.check()?;
        if let Some(validator) = &self.validator {
            validator(record)?;
        }
        Ok(())
    }

    /// Closes the registry for writes. Calling it again is a no-op.
    pub fn freeze(&mut self) {
        if self.frozen {
            tracing::debug!(kind = R::KIND, "Registry is already frozen.");
            return;
        }
        self.frozen = true;
        tracing::info!(
            kind = R::KIND,
            names = self.entries.len(),
            overrides = self.override_count(),
            collisions = self.collisions.len(),
            "Parameter registry frozen."
        );
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Names with registered defaults, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Keys of every stored override, sorted by name, timeframe and symbol.
    pub fn keys(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.entries.iter().flat_map(|(name, entry)| {
            entry
                .overrides
                .keys()
                .map(move |(timeframe, symbol)| ParamKey::new(name.clone(), *timeframe, symbol.clone()))
        })
    }

    pub fn override_count(&self) -> usize {
        self.entries.values().map(|entry| entry.overrides.len()).sum()
    }

    /// Keys whose override was registered more than once, in registration order.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    fn ensure_open(&self, operation: &'static str, name: &str) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen {
                operation,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
