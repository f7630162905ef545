//! Per-test `json_extra` annotations and their collection.
//!
//! A test can be annotated with a collection key and an optional mapping
//! that rewrites its id into a display identifier. When an annotated test
//! finishes its call phase, the raw outcome name is recorded under
//! `extra.<key>.<display-id>` in the verdict document.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::events::{Phase, PhaseReport};

/// Nested extra-data store: collection key -> display id -> raw outcome.
pub type ExtraStore = BTreeMap<String, BTreeMap<String, String>>;

/// Rule for deriving the display identifier from a test id.
pub enum IdMapping {
    /// Computed by a function. `None` drops the entry for that test.
    Callable(Box<dyn Fn(&str) -> Option<String> + Send + Sync>),
    /// Static lookup table. An absent test id drops the entry.
    Static(BTreeMap<String, String>),
}

impl IdMapping {
    /// Wrap a display-id function.
    pub fn callable(map_fn: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        IdMapping::Callable(Box::new(map_fn))
    }

    /// Resolve the display identifier, or `None` when the entry should be
    /// skipped.
    pub fn resolve(&self, test_id: &str) -> Option<String> {
        match self {
            IdMapping::Callable(map_fn) => map_fn(test_id),
            IdMapping::Static(table) => table.get(test_id).cloned(),
        }
    }
}

impl fmt::Debug for IdMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdMapping::Callable(_) => f.write_str("Callable(..)"),
            IdMapping::Static(table) => f.debug_tuple("Static").field(table).finish(),
        }
    }
}

/// Extra-data annotation bound to one test.
#[derive(Debug)]
pub struct JsonExtra {
    pub key: String,
    pub mapping: Option<IdMapping>,
}

impl JsonExtra {
    /// Bind an annotation. The key is required and must be non-empty.
    pub fn new(key: impl Into<String>, mapping: Option<IdMapping>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            bail!("json_extra key must be non-empty");
        }
        Ok(Self { key, mapping })
    }
}

/// Annotations registered for a session, keyed by test id.
#[derive(Debug, Default)]
pub struct AnnotationSet {
    annotations: BTreeMap<String, JsonExtra>,
}

/// On-disk annotation file consumed by the replay host.
#[derive(Debug, Deserialize)]
struct AnnotationFile {
    #[serde(default)]
    annotation: Vec<AnnotationEntry>,
}

#[derive(Debug, Deserialize)]
struct AnnotationEntry {
    test: String,
    key: String,
    mapping: Option<toml::Value>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an annotation for a test id. Re-registering replaces the
    /// previous annotation.
    pub fn register(&mut self, test_id: impl Into<String>, annotation: JsonExtra) -> Result<()> {
        let test_id = test_id.into();
        if test_id.trim().is_empty() {
            bail!("annotation test id must be non-empty");
        }
        self.annotations.insert(test_id, annotation);
        Ok(())
    }

    pub fn lookup(&self, test_id: &str) -> Option<&JsonExtra> {
        self.annotations.get(test_id)
    }

    /// Load and validate an annotation file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read annotations {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("in annotations {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let file: AnnotationFile = toml::from_str(contents).context("parse annotations")?;
        let mut set = Self::new();
        for entry in file.annotation {
            let test = entry.test.clone();
            let annotation = bind_entry(entry)
                .with_context(|| format!("annotation for {} invalid", display_test(&test)))?;
            if set.annotations.insert(test.clone(), annotation).is_some() {
                bail!("duplicate annotation for {test}");
            }
        }
        Ok(set)
    }
}

fn bind_entry(entry: AnnotationEntry) -> Result<JsonExtra> {
    if entry.test.trim().is_empty() {
        bail!("test must be non-empty");
    }
    let mapping = entry.mapping.as_ref().map(bind_mapping).transpose()?;
    JsonExtra::new(entry.key, mapping)
}

/// Build the typed mapping from the untyped file value. Anything other
/// than a table of strings is a configuration error.
fn bind_mapping(value: &toml::Value) -> Result<IdMapping> {
    let toml::Value::Table(table) = value else {
        bail!("mapping must be a table of strings");
    };
    let mut lookup = BTreeMap::new();
    for (test_id, display) in table {
        let toml::Value::String(display) = display else {
            bail!("mapping entry {test_id} must be a string");
        };
        lookup.insert(test_id.clone(), display.clone());
    }
    Ok(IdMapping::Static(lookup))
}

fn display_test(test: &str) -> &str {
    if test.trim().is_empty() { "<empty>" } else { test }
}

/// Record an annotated test's call-phase outcome into the store.
///
/// Setup and teardown reports are ignored; only the call phase carries the
/// test's reportable outcome. The inner map for the annotation's key is
/// created before the display id is resolved, so a key shows up in the
/// document even when all of its entries were dropped.
pub fn collect_extra(store: &mut ExtraStore, annotations: &AnnotationSet, report: &PhaseReport) {
    if report.phase != Phase::Call {
        return;
    }
    let Some(annotation) = annotations.lookup(&report.test_id) else {
        return;
    };
    let entries = store.entry(annotation.key.clone()).or_default();
    let display_id = match &annotation.mapping {
        None => report.test_id.clone(),
        Some(mapping) => match mapping.resolve(&report.test_id) {
            Some(display_id) => display_id,
            None => {
                debug!(
                    test_id = %report.test_id,
                    key = %annotation.key,
                    "mapping produced no display id, entry dropped"
                );
                return;
            }
        },
    };
    entries.insert(display_id, report.outcome.as_str().to_string());
}
