//! Per-phase result events delivered by the host test framework.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a single test execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

/// Raw outcome reported for one phase.
///
/// The three standard outcomes are modeled directly. Anything else (for
/// example a rerun plugin's `"rerun"`) is carried as [`Outcome::Other`]
/// with its raw name preserved, so it survives serialization round-trips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Other(String),
}

impl Outcome {
    /// The raw outcome name, as recorded in `extra` entries.
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
            Outcome::Other(name) => name,
        }
    }
}

impl From<String> for Outcome {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "passed" => Outcome::Passed,
            "failed" => Outcome::Failed,
            "skipped" => Outcome::Skipped,
            _ => Outcome::Other(raw),
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.as_str().to_string()
    }
}

/// Result of executing one phase of one test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseReport {
    /// Stable identifier of the test invocation (node id).
    pub test_id: String,
    pub phase: Phase,
    pub outcome: Outcome,
    /// True when the test was marked expected-to-fail and the phase outcome
    /// contradicts that expectation.
    #[serde(default)]
    pub wasxfail: bool,
}
