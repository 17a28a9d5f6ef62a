// In crates/app-config/src/params.rs

//! Loads parameter files into a [`ParamSet`].
//!
//! One file holds the overrides for one (symbol, timeframe) pair:
//!
//! ```toml
//! # EURUSD_M1.toml
//! [indicators.AC]
//! shift = 0
//!
//! [strategies.AC]
//! signal_open_method = -1
//! signal_open_level = 10
//! ```
//!
//! The symbol and timeframe come from the file name unless the file sets
//! `symbol` / `timeframe` at the top level. A file named after a timeframe
//! only (`M1.toml`, `ANY_M1.toml`) applies to every symbol. A `defaults.toml`
//! file registers additional base records instead of overrides.
//!
//! Any other `<word>_<TIMEFRAME>` stem names a symbol: `hotfix_M30.toml` is
//! read as symbol `HOTFIX`. Files that should not be keyed by their name need
//! a timeframe-only name or explicit `symbol` / `timeframe` keys, and those
//! keys must agree with any key the name carries.

use std::path::{Path, PathBuf};

use core_types::{Symbol, Timeframe};
use serde::de::DeserializeOwned;
use strategies::{IndicatorParams, IndicatorPatch, MethodRanges, ParamSet, StrategyParams, StrategyPatch};
use toml::{Table, Value};

use crate::error::{Error, Result};
use crate::legacy;
use crate::types::ParamSettings;

/// EURUSD presets for the AC indicator and strategy, compiled in.
const EMBEDDED_PRESETS: &[(&str, &str)] = &[
    ("EURUSD_M1.toml", include_str!("../presets/ac/EURUSD_M1.toml")),
    ("EURUSD_M5.toml", include_str!("../presets/ac/EURUSD_M5.toml")),
    ("EURUSD_M15.toml", include_str!("../presets/ac/EURUSD_M15.toml")),
    ("EURUSD_M30.toml", include_str!("../presets/ac/EURUSD_M30.toml")),
    ("EURUSD_H1.toml", include_str!("../presets/ac/EURUSD_H1.toml")),
    ("EURUSD_H4.toml", include_str!("../presets/ac/EURUSD_H4.toml")),
    ("EURUSD_H8.toml", include_str!("../presets/ac/EURUSD_H8.toml")),
];

const DEFAULTS_FILE: &str = "defaults.toml";

/// A parsed override file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamFile {
    pub origin: String,
    pub timeframe: Timeframe,
    pub symbol: Option<Symbol>,
    pub indicators: Vec<(String, IndicatorPatch)>,
    pub strategies: Vec<(String, StrategyPatch)>,
}

/// Base records declared in a `defaults.toml` file.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsFile {
    pub origin: String,
    pub indicators: Vec<(String, IndicatorParams)>,
    pub strategies: Vec<(String, StrategyParams)>,
}

/// Builds and freezes the parameter set described by `settings`.
///
/// Load order: built-in AC defaults, embedded presets (if enabled), then
/// every configured directory in order. Inside a directory `defaults.toml`
/// comes first and the remaining `*.toml` files follow in name order, so a
/// later file wins when two of them define the same key.
pub fn load_params(settings: &ParamSettings, ranges: MethodRanges) -> Result<ParamSet> {
    ranges
        .ensure_consistent()
        .map_err(|source| Error::registry("settings", source))?;

    let mut set = ParamSet::new(ranges);
    set.register_ac_defaults()
        .map_err(|source| Error::registry("built-in defaults", source))?;

    if settings.embedded_presets {
        for (file_name, contents) in EMBEDDED_PRESETS {
            let origin = format!("embedded:{file_name}");
            let file = ParamFile::parse(&origin, file_stem(file_name), contents)?;
            apply_param_file(&mut set, &file)?;
        }
        tracing::debug!(files = EMBEDDED_PRESETS.len(), "Loaded embedded presets.");
    }

    for dir in &settings.dirs {
        load_dir(&mut set, dir)?;
    }

    let collisions = set.collisions();
    if settings.deny_duplicates && !collisions.is_empty() {
        return Err(Error::DuplicateDefinitions {
            keys: collisions.iter().map(ToString::to_string).collect(),
        });
    }

    set.freeze();
    tracing::info!(
        indicator_overrides = set.indicators.override_count(),
        strategy_overrides = set.strategies.override_count(),
        collisions = collisions.len(),
        "Parameter set loaded."
    );
    Ok(set)
}

/// Loads every parameter file of one directory into `set`.
pub fn load_dir(set: &mut ParamSet, dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| Error::IoError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::IoError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();

    let defaults_path = dir.join(DEFAULTS_FILE);
    if let Some(pos) = files.iter().position(|p| *p == defaults_path) {
        let path = files.remove(pos);
        let contents = read(&path)?;
        let defaults = DefaultsFile::parse(&path.display().to_string(), &contents)?;
        apply_defaults_file(set, &defaults)?;
    }

    for path in &files {
        let contents = read(path)?;
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let file = ParamFile::parse(&path.display().to_string(), &stem, &contents)?;
        apply_param_file(set, &file)?;
    }

    tracing::info!(dir = %dir.display(), files = files.len(), "Loaded parameter directory.");
    Ok(())
}

/// Registers every override of `file`.
pub fn apply_param_file(set: &mut ParamSet, file: &ParamFile) -> Result<()> {
    for (name, patch) in &file.indicators {
        set.indicators
            .register_override(name, file.timeframe, file.symbol.clone(), patch)
            .map_err(|source| Error::registry(&file.origin, source))?;
    }
    for (name, patch) in &file.strategies {
        set.strategies
            .register_override(name, file.timeframe, file.symbol.clone(), patch)
            .map_err(|source| Error::registry(&file.origin, source))?;
    }
    Ok(())
}

/// Registers every base record of `file`.
pub fn apply_defaults_file(set: &mut ParamSet, file: &DefaultsFile) -> Result<()> {
    for (name, base) in &file.indicators {
        set.indicators
            .register_defaults(name, base.clone())
            .map_err(|source| Error::registry(&file.origin, source))?;
    }
    for (name, base) in &file.strategies {
        set.strategies
            .register_defaults(name, base.clone())
            .map_err(|source| Error::registry(&file.origin, source))?;
    }
    Ok(())
}

impl ParamFile {
    /// Parses an override file. `stem` is the file name without extension.
    pub fn parse(origin: &str, stem: &str, contents: &str) -> Result<Self> {
        let mut table = parse_table(origin, contents)?;
        let (stem_symbol, stem_timeframe) = split_stem(stem);

        let symbol = match table.remove("symbol") {
            Some(value) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| Error::invalid(origin, "`symbol` must be a string"))?;
                Some(Symbol::new(raw).map_err(|e| Error::invalid(origin, e.to_string()))?)
            }
            None => stem_symbol.clone(),
        };
        let timeframe = match table.remove("timeframe") {
            Some(value) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| Error::invalid(origin, "`timeframe` must be a string"))?;
                raw.parse::<Timeframe>()
                    .map_err(|e| Error::invalid(origin, e.to_string()))?
            }
            None => stem_timeframe.ok_or_else(|| {
                Error::invalid(
                    origin,
                    "no timeframe: set `timeframe` or name the file <SYMBOL>_<TIMEFRAME>.toml",
                )
            })?,
        };

        if let (Some(explicit), Some(named)) = (&symbol, &stem_symbol) {
            if explicit != named {
                return Err(Error::invalid(
                    origin,
                    format!("file name says {named} but `symbol` is {explicit}"),
                ));
            }
        }
        if let Some(named) = stem_timeframe {
            if named != timeframe {
                return Err(Error::invalid(
                    origin,
                    format!("file name says {named} but `timeframe` is {timeframe}"),
                ));
            }
        }

        let indicators = take_section::<IndicatorPatch>(origin, &mut table, "indicators")?;
        let strategies = take_section::<StrategyPatch>(origin, &mut table, "strategies")?;
        reject_leftovers(origin, table)?;

        Ok(Self {
            origin: origin.to_string(),
            timeframe,
            symbol,
            indicators,
            strategies,
        })
    }
}

impl DefaultsFile {
    pub fn parse(origin: &str, contents: &str) -> Result<Self> {
        let mut table = parse_table(origin, contents)?;
        let indicators = take_section::<IndicatorParams>(origin, &mut table, "indicators")?;
        let strategies = take_section::<StrategyParams>(origin, &mut table, "strategies")?;
        reject_leftovers(origin, table)?;

        Ok(Self {
            origin: origin.to_string(),
            indicators,
            strategies,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::IoError {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_table(origin: &str, contents: &str) -> Result<Table> {
    toml::from_str(contents).map_err(|source| Error::TomlError {
        origin: origin.to_string(),
        source,
    })
}

/// Removes `[section.<NAME>]` tables and deserializes each one after key normalisation.
fn take_section<T: DeserializeOwned>(
    origin: &str,
    table: &mut Table,
    section: &str,
) -> Result<Vec<(String, T)>> {
    let Some(value) = table.remove(section) else {
        return Ok(Vec::new());
    };
    let Value::Table(named) = value else {
        return Err(Error::invalid(origin, format!("`{section}` must be a table")));
    };

    let mut out = Vec::with_capacity(named.len());
    for (name, fields) in named {
        let Value::Table(fields) = fields else {
            return Err(Error::invalid(origin, format!("`{section}.{name}` must be a table")));
        };
        let fields = legacy::normalize_table(&name, fields)
            .map_err(|reason| Error::invalid(origin, format!("[{section}.{name}] {reason}")))?;
        let parsed = Value::Table(fields)
            .try_into::<T>()
            .map_err(|e| Error::invalid(origin, format!("[{section}.{name}] {e}")))?;
        out.push((name, parsed));
    }
    Ok(out)
}

fn reject_leftovers(origin: &str, table: Table) -> Result<()> {
    match table.keys().next() {
        Some(key) => Err(Error::invalid(origin, format!("unknown top-level key `{key}`"))),
        None => Ok(()),
    }
}

fn file_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".toml").unwrap_or(file_name)
}

/// `EURUSD_M1` -> (EURUSD, M1); `M1` and `ANY_M1` -> (wildcard, M1).
/// Every other prefix is taken as the symbol.
fn split_stem(stem: &str) -> (Option<Symbol>, Option<Timeframe>) {
    if let Ok(timeframe) = stem.parse::<Timeframe>() {
        return (None, Some(timeframe));
    }
    let Some((prefix, suffix)) = stem.rsplit_once('_') else {
        return (None, None);
    };
    let Ok(timeframe) = suffix.parse::<Timeframe>() else {
        return (None, None);
    };
    let symbol = if prefix.eq_ignore_ascii_case("ANY") {
        None
    } else {
        Symbol::new(prefix).ok()
    };
    (symbol, Some(timeframe))
}
