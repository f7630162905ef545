//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::extra::AnnotationSet;
use crate::replay::read_event_log;
use crate::report::{read_verdict, write_verdict};
use crate::session::{Session, SessionConfig};

/// Replay a recorded event log through a session and write the verdict.
pub fn replay(
    events_path: &Path,
    json_path: &str,
    annotations_path: Option<&Path>,
    rerun_support: bool,
    worker: bool,
) -> Result<()> {
    let annotations = match annotations_path {
        Some(path) => AnnotationSet::load(path).context("load annotations")?,
        None => AnnotationSet::new(),
    };

    let config = SessionConfig {
        json_path: json_path.to_string(),
        rerun_capability: rerun_support,
        worker,
    };
    let Some(mut session) = Session::register(&config, annotations)? else {
        debug!("worker process, nothing to aggregate");
        return Ok(());
    };

    let reports = read_event_log(events_path)?;
    debug!(count = reports.len(), "event log loaded");
    for report in &reports {
        session.record(report).context("record phase report")?;
    }

    let out_path = session.json_path().to_path_buf();
    let verdict = session.finish();
    write_verdict(&out_path, &verdict)?;
    println!("generated json file: {}", out_path.display());
    Ok(())
}

/// Print the tallies of an existing verdict document.
pub fn show(path: &Path) -> Result<()> {
    let verdict = read_verdict(path)?;
    println!(
        "verdict: start={} duration_secs={:.3}",
        verdict.start, verdict.duration
    );
    println!(
        "verdict: passed={} failed={} xpassed={} xfailed={} errors={} skipped={} sum={}",
        verdict.passed,
        verdict.failed,
        verdict.xpassed,
        verdict.xfailed,
        verdict.errors,
        verdict.skipped,
        verdict.sum
    );
    match verdict.rerun {
        Some(count) => println!("verdict: rerun={count}"),
        None => println!("verdict: rerun=unsupported"),
    }
    for (key, entries) in &verdict.extra {
        println!("verdict: extra {} entries={}", key, entries.len());
    }
    Ok(())
}
