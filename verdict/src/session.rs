//! Session lifecycle: one aggregation context per test run.
//!
//! The [`Session`] replaces registration-time global state with an explicit
//! context object: created at session start, fed every phase report, and
//! consumed at session finish into a [`Verdict`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::expand_json_path;
use crate::events::PhaseReport;
use crate::extra::{AnnotationSet, ExtraStore, JsonExtra, collect_extra};
use crate::report::Verdict;
use crate::tally::RunTally;

/// Host-supplied configuration for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Raw output path; environment variables and `~` are expanded.
    pub json_path: String,
    /// Whether the host detected a rerun-capable plugin at startup.
    pub rerun_capability: bool,
    /// True on worker processes of a distributed run.
    pub worker: bool,
}

/// Aggregation context for one test run.
#[derive(Debug)]
pub struct Session {
    json_path: PathBuf,
    started_at: DateTime<Local>,
    tally: RunTally,
    extra: ExtraStore,
    annotations: AnnotationSet,
}

impl Session {
    /// Register a session for this process.
    ///
    /// Returns `None` on worker processes: only the coordinating process
    /// tallies outcomes and emits the verdict.
    pub fn register(config: &SessionConfig, annotations: AnnotationSet) -> Result<Option<Self>> {
        if config.worker {
            debug!("worker process, verdict session suppressed");
            return Ok(None);
        }
        let json_path = expand_json_path(&config.json_path)?;
        info!(json_path = %json_path.display(), "verdict session started");
        Ok(Some(Self {
            json_path,
            started_at: Local::now(),
            tally: RunTally::new(config.rerun_capability),
            extra: ExtraStore::new(),
            annotations,
        }))
    }

    /// Expanded, absolute path of the verdict document.
    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Attach a `json_extra` annotation to a test id.
    pub fn annotate(&mut self, test_id: impl Into<String>, annotation: JsonExtra) -> Result<()> {
        self.annotations.register(test_id, annotation)
    }

    /// Feed one phase report: classifies the outcome and, for call-phase
    /// reports, collects annotated extra data.
    pub fn record(&mut self, report: &PhaseReport) -> Result<()> {
        self.tally.classify(report)?;
        collect_extra(&mut self.extra, &self.annotations, report);
        Ok(())
    }

    /// Close the session and build the verdict document.
    pub fn finish(self) -> Verdict {
        let duration = Local::now() - self.started_at;
        let duration_secs = duration.num_milliseconds() as f64 / 1000.0;
        info!(duration_secs, sum = self.tally.sum(), "verdict session finished");
        Verdict {
            start: self.started_at.format("%d.%m.%Y %H:%M:%S").to_string(),
            duration: duration_secs,
            passed: self.tally.passed,
            failed: self.tally.failed,
            xpassed: self.tally.xpassed,
            xfailed: self.tally.xfailed,
            errors: self.tally.errors,
            skipped: self.tally.skipped,
            rerun: self.tally.rerun,
            sum: self.tally.sum(),
            extra: self.extra,
        }
    }
}
