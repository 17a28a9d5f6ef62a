// In crates/app-config/src/types.rs

use std::path::PathBuf;

use serde::Deserialize;
use strategies::MethodRanges;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where parameter records come from.
    #[serde(default)]
    pub params: ParamSettings,
    /// Selector ranges the strategy engine accepts.
    #[serde(default)]
    pub validation: MethodRanges,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParamSettings {
    /// Load the EURUSD AC presets compiled into the binary.
    #[serde(default = "default_embedded_presets")]
    pub embedded_presets: bool,
    /// Directories of `<SYMBOL>_<TIMEFRAME>.toml` files, loaded in order after the presets.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    /// Fail loading when two files define the same key instead of keeping the last one.
    #[serde(default)]
    pub deny_duplicates: bool,
}

impl Default for ParamSettings {
    fn default() -> Self {
        Self {
            embedded_presets: default_embedded_presets(),
            dirs: Vec::new(),
            deny_duplicates: false,
        }
    }
}

fn default_embedded_presets() -> bool { true }
