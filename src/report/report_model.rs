use serde::Serialize;

use crate::scenario::scenario_model::ScenarioResult;

// ============================================================================
// Replay report: aggregates multiple ScenarioResult instances
// ============================================================================

/// Aggregated report for a batch of scenario replays.
///
/// Built from a `Vec<ScenarioResult>` via `from_results()`. Consumed by the
/// console and JSON reporters.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Total number of scenarios
    pub total: usize,

    /// Number of scenarios whose captures matched expectations
    pub passed: usize,

    /// Number of failing scenarios
    pub failed: usize,

    /// Total number of credentials forwarded to the sink
    pub captures: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Individual scenario results
    pub results: Vec<ScenarioResult>,
}

impl ReplayReport {
    pub fn from_results(results: Vec<ScenarioResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let captures = results.iter().map(|r| r.capture_count()).sum();
        Self {
            total,
            passed,
            failed: total - passed,
            captures,
            duration_ms: None,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
