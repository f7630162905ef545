//! Outcome classification into the running tally.

use anyhow::{Result, bail};

use crate::events::{Outcome, Phase, PhaseReport};

/// Running tally of classified outcomes for one session.
///
/// `rerun` is present only when the host reported rerun capability at
/// session start; it stays absent for the whole run otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub passed: u64,
    pub failed: u64,
    pub errors: u64,
    pub skipped: u64,
    pub xpassed: u64,
    pub xfailed: u64,
    pub rerun: Option<u64>,
}

impl RunTally {
    pub fn new(rerun_capability: bool) -> Self {
        Self {
            rerun: rerun_capability.then_some(0),
            ..Self::default()
        }
    }

    /// Classify one phase report into at most one counter.
    ///
    /// Fails when an outcome outside passed/failed/skipped arrives while
    /// rerun support was not detected at session start.
    pub fn classify(&mut self, report: &PhaseReport) -> Result<()> {
        match &report.outcome {
            Outcome::Passed => {
                // Setup and teardown also report passed for every healthy
                // test; only the call phase counts toward the verdict.
                if report.phase == Phase::Call {
                    if report.wasxfail {
                        self.xpassed += 1;
                    } else {
                        self.passed += 1;
                    }
                }
            }
            Outcome::Failed => {
                if report.phase == Phase::Call {
                    // An xfail-marked failure in the call phase counts as an
                    // unexpected pass, not a failure.
                    if report.wasxfail {
                        self.xpassed += 1;
                    } else {
                        self.failed += 1;
                    }
                } else {
                    self.errors += 1;
                }
            }
            Outcome::Skipped => {
                if report.wasxfail {
                    self.xfailed += 1;
                } else {
                    self.skipped += 1;
                }
            }
            Outcome::Other(name) => match self.rerun.as_mut() {
                Some(count) => *count += 1,
                None => bail!(
                    "outcome {} for {} requires rerun support, which was not detected at session start",
                    name,
                    report.test_id
                ),
            },
        }
        Ok(())
    }

    /// Tests with a definite result: everything except skips and reruns.
    pub fn sum(&self) -> u64 {
        self.passed + self.failed + self.xpassed + self.xfailed + self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(phase: Phase, outcome: Outcome, wasxfail: bool) -> PhaseReport {
        PhaseReport {
            test_id: "tests::sample".to_string(),
            phase,
            outcome,
            wasxfail,
        }
    }

    #[test]
    fn call_passed_counts_passed_or_xpassed() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Call, Outcome::Passed, false))
            .expect("classify");
        tally
            .classify(&report(Phase::Call, Outcome::Passed, true))
            .expect("classify");
        assert_eq!(tally.passed, 1);
        assert_eq!(tally.xpassed, 1);
    }

    #[test]
    fn setup_and_teardown_passes_are_not_counted() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Setup, Outcome::Passed, false))
            .expect("classify");
        tally
            .classify(&report(Phase::Teardown, Outcome::Passed, false))
            .expect("classify");
        assert_eq!(tally, RunTally::new(false));
    }

    #[test]
    fn call_failed_with_xfail_marker_is_an_unexpected_pass() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Call, Outcome::Failed, true))
            .expect("classify");
        assert_eq!(tally.xpassed, 1);
        assert_eq!(tally.failed, 0);
    }

    #[test]
    fn call_failed_without_marker_is_a_failure() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Call, Outcome::Failed, false))
            .expect("classify");
        assert_eq!(tally.failed, 1);
    }

    #[test]
    fn setup_and_teardown_failures_are_errors_regardless_of_marker() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Setup, Outcome::Failed, true))
            .expect("classify");
        tally
            .classify(&report(Phase::Teardown, Outcome::Failed, false))
            .expect("classify");
        assert_eq!(tally.errors, 2);
        assert_eq!(tally.xpassed, 0);
        assert_eq!(tally.failed, 0);
    }

    #[test]
    fn skipped_splits_on_marker() {
        let mut tally = RunTally::new(false);
        tally
            .classify(&report(Phase::Setup, Outcome::Skipped, false))
            .expect("classify");
        tally
            .classify(&report(Phase::Call, Outcome::Skipped, true))
            .expect("classify");
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.xfailed, 1);
    }

    #[test]
    fn unknown_outcome_counts_as_rerun_when_supported() {
        let mut tally = RunTally::new(true);
        tally
            .classify(&report(
                Phase::Call,
                Outcome::Other("rerun".to_string()),
                false,
            ))
            .expect("classify");
        assert_eq!(tally.rerun, Some(1));
    }

    #[test]
    fn unknown_outcome_without_rerun_support_is_an_error() {
        let mut tally = RunTally::new(false);
        let err = tally
            .classify(&report(
                Phase::Call,
                Outcome::Other("rerun".to_string()),
                false,
            ))
            .expect_err("unsupported outcome");
        assert!(err.to_string().contains("rerun support"));
        assert_eq!(tally, RunTally::new(false));
    }

    #[test]
    fn sum_counts_definite_results_only() {
        let mut tally = RunTally::new(true);
        let reports = [
            report(Phase::Call, Outcome::Passed, false),
            report(Phase::Call, Outcome::Passed, true),
            report(Phase::Call, Outcome::Failed, false),
            report(Phase::Setup, Outcome::Failed, false),
            report(Phase::Call, Outcome::Skipped, true),
            report(Phase::Setup, Outcome::Skipped, false),
            report(Phase::Call, Outcome::Other("rerun".to_string()), false),
        ];
        for report in &reports {
            tally.classify(report).expect("classify");
        }
        assert_eq!(tally.sum(), 5);
        assert_eq!(
            tally.sum(),
            tally.passed + tally.failed + tally.xpassed + tally.xfailed + tally.errors
        );
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.rerun, Some(1));
    }
}
