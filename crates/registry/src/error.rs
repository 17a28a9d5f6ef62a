// In crates/registry/src/error.rs

use thiserror::Error;

use crate::key::ParamKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Defaults for `{name}` are already registered")]
    DuplicateDefault { name: String },

    #[error("Cannot override `{name}`: no defaults are registered under that name")]
    UnknownBase { name: String },

    #[error("No parameters are registered under `{name}`")]
    NotFound { name: String },

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Registry is frozen; cannot {operation} `{name}`")]
    Frozen { operation: &'static str, name: String },

    /// An `InvalidField` raised while registering the record stored under `key`.
    #[error("{key}: {source}")]
    Record {
        key: ParamKey,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attaches the offending key, unless the error already carries one.
    pub(crate) fn at(self, key: &ParamKey) -> Self {
        match self {
            Error::Record { .. } => self,
            other => Error::Record {
                key: key.clone(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
