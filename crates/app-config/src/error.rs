// In crates/app-config/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML in {origin}: {source}")]
    TomlError {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid parameter file {origin}: {reason}")]
    InvalidParamFile { origin: String, reason: String },

    #[error("{origin}: {source}")]
    Registry {
        origin: String,
        #[source]
        source: registry::Error,
    },

    #[error("Conflicting parameter definitions for {}", keys.join(", "))]
    DuplicateDefinitions { keys: Vec<String> },
}

impl Error {
    pub(crate) fn invalid(origin: &str, reason: impl Into<String>) -> Self {
        Error::InvalidParamFile {
            origin: origin.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn registry(origin: &str, source: registry::Error) -> Self {
        Error::Registry {
            origin: origin.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
