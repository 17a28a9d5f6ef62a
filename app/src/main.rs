// In app/src/main.rs

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use app_config::{ParamHandle, Settings};
use clap::{Parser, Subcommand};
use core_types::{Symbol, Timeframe};
use serde::Serialize;
use strategies::ParamSet;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Loads, checks and inspects AC default trading parameters.")]
struct Cli {
    /// Directory holding `base.toml` and the per-environment settings files.
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Loads every parameter source, validates it and reports conflicts.
    Check {
        /// Fail when two sources define the same key.
        #[arg(long)]
        deny_duplicates: bool,
    },

    /// Prints the resolved indicator and strategy parameters for one key as JSON.
    Show {
        /// The indicator/strategy name (e.g., "AC").
        #[arg(short, long, default_value = "AC")]
        name: String,

        /// The period (e.g., "M1", "H4").
        #[arg(short, long)]
        timeframe: Timeframe,

        /// The trading symbol (e.g., "EURUSD"). Omit to see the wildcard record.
        #[arg(short, long)]
        symbol: Option<Symbol>,
    },

    /// Lists every registered override key.
    List {
        /// Print JSON instead of one key per line.
        #[arg(long)]
        json: bool,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings_from(&cli.config_dir)
        .with_context(|| format!("Failed to load settings from {}", cli.config_dir.display()))?;
    init_tracing(&settings.app.log_level);

    tracing::debug!(environment = %settings.app.environment, "Settings loaded.");

    match cli.command {
        Commands::Check { deny_duplicates } => handle_check(settings, deny_duplicates)?,
        Commands::Show {
            name,
            timeframe,
            symbol,
        } => handle_show(&settings, &name, timeframe, symbol.as_ref())?,
        Commands::List { json } => handle_list(&settings, json)?,
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    let (level, recognized) = match tracing::Level::from_str(log_level) {
        Ok(level) => (level, true),
        Err(_) => (tracing::Level::INFO, false),
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    if !recognized {
        tracing::warn!(log_level, "Unknown log level in settings; using INFO.");
    }
}

fn load(settings: &Settings) -> Result<ParamHandle> {
    ParamHandle::load(settings).context("Parameter configuration is invalid")
}

// --- "Check" Subcommand Logic ---

fn handle_check(mut settings: Settings, deny_duplicates: bool) -> Result<()> {
    settings.params.deny_duplicates |= deny_duplicates;
    let handle = load(&settings)?;
    print!("{}", check_report(&handle.current()));
    Ok(())
}

/// The loader already warned about each collision, so they are only listed here.
fn check_report(set: &ParamSet) -> String {
    let collisions = set.collisions();
    let mut report = String::from("Parameter configuration OK.\n");
    report.push_str(&format!(
        "  names: {}\n",
        set.strategies.names().collect::<Vec<_>>().join(", ")
    ));
    report.push_str(&format!("  indicator overrides: {}\n", set.indicators.override_count()));
    report.push_str(&format!("  strategy overrides:  {}\n", set.strategies.override_count()));
    report.push_str(&format!("  duplicate keys:      {}\n", collisions.len()));
    for collision in &collisions {
        report.push_str(&format!("    {collision}\n"));
    }
    report
}

// --- "Show" Subcommand Logic ---

fn handle_show(settings: &Settings, name: &str, timeframe: Timeframe, symbol: Option<&Symbol>) -> Result<()> {
    let handle = load(settings)?;
    let resolved = handle
        .current()
        .resolve(name, timeframe, symbol)
        .with_context(|| format!("No parameters for {name} on {timeframe}"))?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

// --- "List" Subcommand Logic ---

#[derive(Debug, Serialize)]
struct KeyRow {
    kind: &'static str,
    key: String,
}

fn handle_list(settings: &Settings, json: bool) -> Result<()> {
    let handle = load(settings)?;
    let rows = key_rows(&handle.current());

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{:<10} {}", row.kind, row.key);
        }
    }
    Ok(())
}

fn key_rows(set: &ParamSet) -> Vec<KeyRow> {
    let indicators = set.indicators.keys().map(|key| KeyRow {
        kind: "indicator",
        key: key.to_string(),
    });
    let strategies = set.strategies.keys().map(|key| KeyRow {
        kind: "strategy",
        key: key.to_string(),
    });
    indicators.chain(strategies).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use app_config::ParamSettings;
    use app_config::types::AppSettings;
    use strategies::MethodRanges;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    use super::*;

    #[test]
    fn show_parses_terminal_style_arguments() {
        let cli = Cli::try_parse_from(["paramctl", "show", "-t", "period_m30", "-s", "eurusd"]).unwrap();
        match cli.command {
            Commands::Show {
                name,
                timeframe,
                symbol,
            } => {
                assert_eq!(name, "AC");
                assert_eq!(timeframe, Timeframe::M30);
                assert_eq!(symbol, Some(Symbol::new("EURUSD").unwrap()));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config_dir, PathBuf::from("config"));
    }

    #[test]
    fn show_rejects_unknown_timeframe() {
        assert!(Cli::try_parse_from(["paramctl", "show", "-t", "H2"]).is_err());
    }

    /// Counts WARN events seen while it is installed.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn check_warns_once_per_collision() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("EURUSD_M30.toml"), "[strategies.AC]\nsignal_open_method = -2\n").unwrap();
        std::fs::write(
            dir.path().join("zz_hotfix.toml"),
            "symbol = \"EURUSD\"\ntimeframe = \"M30\"\n[strategies.AC]\nsignal_open_method = 4\n",
        )
        .unwrap();
        let settings = Settings {
            app: AppSettings {
                environment: "test".to_string(),
                log_level: "info".to_string(),
            },
            params: ParamSettings {
                embedded_presets: false,
                dirs: vec![dir.path().to_path_buf()],
                deny_duplicates: false,
            },
            validation: MethodRanges::default(),
        };

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let report = tracing::subscriber::with_default(subscriber, || {
            let handle = load(&settings).unwrap();
            check_report(&handle.current())
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        assert!(report.contains("duplicate keys:      1"), "{report}");
        assert!(report.contains("strategy AC/M30/EURUSD"), "{report}");
    }
}
