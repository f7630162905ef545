//! The verdict document and its emission.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extra::ExtraStore;

/// Final verdict document, written once at session end.
///
/// `rerun` serializes as `null` when no rerun capability was detected.
/// `sum` counts tests with a definite result: passed + failed + xpassed +
/// xfailed + errors, excluding skips and reruns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub start: String,
    pub duration: f64,
    pub passed: u64,
    pub failed: u64,
    pub xpassed: u64,
    pub xfailed: u64,
    pub errors: u64,
    pub skipped: u64,
    pub rerun: Option<u64>,
    pub sum: u64,
    pub extra: ExtraStore,
}

/// Write the verdict as JSON, creating the parent directory if absent.
pub fn write_verdict(path: &Path, verdict: &Verdict) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(verdict).context("serialize verdict")?;
    fs::write(path, format!("{contents}\n"))
        .with_context(|| format!("write verdict {}", path.display()))?;
    Ok(())
}

pub fn read_verdict(path: &Path) -> Result<Verdict> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read verdict {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse verdict {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn verdict() -> Verdict {
        Verdict {
            start: "05.08.2026 09:30:00".to_string(),
            duration: 1.25,
            passed: 3,
            failed: 1,
            xpassed: 0,
            xfailed: 1,
            errors: 0,
            skipped: 0,
            rerun: None,
            sum: 5,
            extra: BTreeMap::from([(
                "auth".to_string(),
                BTreeMap::from([("login-ok".to_string(), "passed".to_string())]),
            )]),
        }
    }

    #[test]
    fn document_has_exactly_the_expected_keys() {
        let value = serde_json::to_value(verdict()).expect("to value");
        let object = value.as_object().expect("object");
        // serde_json maps iterate in sorted key order.
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected = vec![
            "start", "duration", "passed", "failed", "xpassed", "xfailed", "errors", "skipped",
            "rerun", "sum", "extra",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert!(object.get("rerun").expect("rerun").is_null());
    }

    #[test]
    fn rerun_serializes_as_integer_when_present() {
        let verdict = Verdict {
            rerun: Some(2),
            ..verdict()
        };
        let value = serde_json::to_value(verdict).expect("to value");
        assert_eq!(value["rerun"], serde_json::json!(2));
    }

    #[test]
    fn write_creates_parent_directory_and_round_trips() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("reports/nested/verdict.json");
        let original = verdict();

        write_verdict(&path, &original).expect("write");
        let back = read_verdict(&path).expect("read");
        assert_eq!(back, original);
    }

    #[test]
    fn write_fails_on_unwritable_path() {
        let temp = tempdir().expect("tempdir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let path = blocker.join("verdict.json");
        let err = write_verdict(&path, &verdict()).expect_err("unwritable");
        assert!(err.to_string().contains("create"));
    }
}
