use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::observer::subscription::InsertionScan;
use crate::scenario::runner::RunOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "autofill-observer",
    version,
    about = "Credential capture heuristics for form submissions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: autofill-observer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Autofill service endpoint that receives captures
    #[arg(long, global = true)]
    pub sink_endpoint: Option<String>,

    /// Append decision trace events to this JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay page scenarios from YAML files
    Run {
        /// Path to a scenario YAML file or directory of YAML files
        #[arg(long)]
        scenario: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// How inserted nodes are searched for forms (overrides config)
        #[arg(long, value_enum)]
        scan: Option<InsertionScan>,
    },

    /// Run the credential heuristic on one submitted form (JSON)
    Extract {
        /// Path to a JSON file: {"url": "...", "fields": [{"type", "name", "value"}]}
        #[arg(long)]
        form: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `autofill-observer.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    #[serde(default)]
    pub scan: InsertionScan,

    #[serde(default = "default_true")]
    pub runs_on_subframes: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            scan: InsertionScan::default(),
            runs_on_subframes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_timeout_secs() -> u64 { 10 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("autofill-observer.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build replay options: CLI > config file > defaults.
pub fn build_run_options(
    config: &AppConfig,
    scan: Option<InsertionScan>,
    trace: Option<&str>,
) -> RunOptions {
    RunOptions {
        scan: scan.unwrap_or(config.observer.scan),
        runs_on_subframes: config.observer.runs_on_subframes,
        trace_path: trace
            .map(str::to_string)
            .or_else(|| config.trace.path.clone()),
    }
}

/// Map `-v` occurrences to a log filter directive.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
