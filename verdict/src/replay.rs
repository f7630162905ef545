//! Recorded event-log replay.
//!
//! The replay host reads JSON Lines: one [`PhaseReport`] object per line,
//! in the order the host framework delivered them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::events::PhaseReport;

/// Read a JSONL event log. Blank lines are ignored.
pub fn read_event_log(path: &Path) -> Result<Vec<PhaseReport>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read event log {}", path.display()))?;
    parse_event_log(&contents).with_context(|| format!("parse event log {}", path.display()))
}

pub fn parse_event_log(contents: &str) -> Result<Vec<PhaseReport>> {
    let mut reports = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let report: PhaseReport = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid phase report", index + 1))?;
        reports.push(report);
    }
    Ok(reports)
}
