// In crates/registry/src/lib.rs

use core_types::{Symbol, Timeframe};

pub mod error;
pub mod key;
pub mod registry;

// Re-export public types
pub use error::{Error, Result};
pub use key::{Collision, ParamKey};
pub use registry::{Registry, Validator};

/// A parameter record that can live in a [`Registry`].
///
/// Records are plain values. An override is produced by cloning the base
/// default for a name, applying a [`Record::Patch`] on top of it and binding
/// the key it is registered under.
pub trait Record: Clone + std::fmt::Debug {
    /// The partial field set an override replaces. `Default` must be the empty patch.
    type Patch: Default + std::fmt::Debug;

    /// Short label used in log lines and error messages, e.g. "indicator".
    const KIND: &'static str;

    /// Replaces every field the patch mentions. Fields the patch leaves out keep their value.
    fn apply(&mut self, patch: &Self::Patch);

    /// Stamps the key fields an override is registered under onto the record.
    fn bind(&mut self, timeframe: Timeframe, symbol: Option<&Symbol>);

    /// Constraints the record enforces on itself regardless of the host engine.
    fn check(&self) -> Result<()>;
}
