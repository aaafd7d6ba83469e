use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::capture::capture_model::Field;
use crate::capture::extractor::extract_credential;
use crate::error::ScenarioError;
use crate::report::console::format_console_report;
use crate::report::report_model::ReplayReport;
use crate::scenario::runner::{RunOptions, ScenarioRunner};
use crate::scenario::scenario_model::Scenario;
use crate::sink::http::HttpSink;

// ============================================================================
// run subcommand
// ============================================================================

/// Replay scenarios and return whether all of them passed.
pub fn cmd_run(
    scenario_path: &str,
    format: &str,
    output: Option<&str>,
    options: RunOptions,
    sink_endpoint: Option<&str>,
    sink_timeout_secs: u64,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = load_scenarios(scenario_path)?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    info!(count = scenarios.len(), scan = ?options.scan, "replaying scenarios");

    let mut runner = ScenarioRunner::new(options);
    if let Some(endpoint) = sink_endpoint {
        let sink = HttpSink::new(endpoint, sink_timeout_secs)?;
        runner = runner.with_forward(Rc::new(sink));
    }

    let start = std::time::Instant::now();
    let mut results = Vec::new();
    for scenario in &scenarios {
        debug!(name = %scenario.name, "replaying");
        results.push(runner.run(scenario));
    }
    let duration = start.elapsed().as_millis();

    let report = ReplayReport::from_results(results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

/// Load scenarios from a single YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, ScenarioError> {
    let io_err = |source| ScenarioError::Io {
        path: path.to_string(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    if metadata.is_dir() {
        let mut scenarios = Vec::new();
        for entry in std::fs::read_dir(path).map_err(io_err)? {
            let p = entry.map_err(io_err)?.path();
            if p.extension().map_or(false, |e| e == "yaml" || e == "yml") {
                scenarios.push(read_scenario(&p.to_string_lossy())?);
            }
        }
        // Sort by name for deterministic order
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    } else {
        Ok(vec![read_scenario(path)?])
    }
}

fn read_scenario(path: &str) -> Result<Scenario, ScenarioError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ScenarioError::Yaml {
        path: path.to_string(),
        source,
    })
}

// ============================================================================
// extract subcommand
// ============================================================================

/// A single submitted form, as fed to `extract`.
#[derive(Debug, Deserialize)]
pub struct SubmittedForm {
    pub url: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Run the heuristic on one form and print the capture as JSON.
///
/// Returns whether a credential was captured.
pub fn cmd_extract(form_path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(form_path)?;
    let form: SubmittedForm = serde_json::from_str(&content)?;

    match extract_credential(&form.url, &form.fields) {
        Some(credential) => {
            println!("{}", serde_json::to_string_pretty(&credential)?);
            Ok(true)
        }
        None => {
            println!("No credential captured (no password value)");
            Ok(false)
        }
    }
}
