// In crates/app-config/src/handle.rs

use std::sync::{Arc, PoisonError, RwLock};

use strategies::ParamSet;

use crate::error::Result;
use crate::params::load_params;
use crate::types::Settings;

/// The parameter set readers currently see.
///
/// Readers take a cheap `Arc` snapshot and never observe a half-loaded set.
/// A reload builds and freezes a complete new set first and only then swaps
/// the reference, so a failed reload leaves the previous set in place.
#[derive(Debug)]
pub struct ParamHandle {
    current: RwLock<Arc<ParamSet>>,
}

impl ParamHandle {
    pub fn new(mut set: ParamSet) -> Self {
        set.freeze();
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    /// Loads the parameter set described by `settings`.
    pub fn load(settings: &Settings) -> Result<Self> {
        let set = load_params(&settings.params, settings.validation)?;
        Ok(Self::new(set))
    }

    pub fn current(&self) -> Arc<ParamSet> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publishes `set` and returns the one it replaced.
    pub fn replace(&self, mut set: ParamSet) -> Arc<ParamSet> {
        set.freeze();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(set))
    }

    /// Rebuilds the set from `settings` and swaps it in. On error nothing changes.
    pub fn reload(&self, settings: &Settings) -> Result<()> {
        let set = load_params(&settings.params, settings.validation)?;
        self.replace(set);
        tracing::info!("Parameter set reloaded.");
        Ok(())
    }
}
