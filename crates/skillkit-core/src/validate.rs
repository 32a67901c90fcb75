//! Validation runner: scan, optionally reconcile, then check every invariant
//! and aggregate findings into a pass/fail report.

use crate::config::{Config, WarnLevel};
use crate::docs::check_docs;
use crate::error::Result;
use crate::finding::{Severity, ValidationFinding};
use crate::manifest::ManifestStore;
use crate::paths;
use crate::reconcile::{reconcile_all, tracked_categories, ReconcileResult};
use crate::references::validate_references;
use crate::scanner::{scan_category, ScanOutcome};
use crate::types::{Category, ContentRef};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

const SYNC_HINT: &str = "run `skillkit sync`";

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Scanning,
    Reconciling,
    Validating,
    Done { pass: bool },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => f.write_str("idle"),
            Stage::Scanning => f.write_str("scanning"),
            Stage::Reconciling => f.write_str("reconciling"),
            Stage::Validating => f.write_str("validating"),
            Stage::Done { pass: true } => f.write_str("done (pass)"),
            Stage::Done { pass: false } => f.write_str("done (fail)"),
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub findings: Vec<ValidationFinding>,
    /// Present only in fix mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reconciled: Vec<ReconcileResult>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct Validator<'a> {
    root: &'a Path,
    config: &'a Config,
    stage: Stage,
}

impl<'a> Validator<'a> {
    pub fn new(root: &'a Path, config: &'a Config) -> Self {
        Self {
            root,
            config,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "validation stage");
        self.stage = stage;
    }

    /// `strict = false` checks without writing. `strict = true` reconciles
    /// first, then checks the result; the verdict is the post-fix check.
    pub fn validate(&mut self, strict: bool) -> Result<ValidationReport> {
        let mut reconciled = Vec::new();
        if strict {
            self.enter(Stage::Reconciling);
            reconciled = reconcile_all(self.root, self.config)?;
        }
        let findings = self.check()?;
        let pass = !findings.iter().any(|f| f.is_error());
        self.enter(Stage::Done { pass });
        Ok(ValidationReport {
            pass,
            findings,
            reconciled,
        })
    }

    fn check(&mut self) -> Result<Vec<ValidationFinding>> {
        self.enter(Stage::Scanning);
        let store = ManifestStore::open(self.root, self.config)?;
        let mut scans: BTreeMap<Category, ScanOutcome> = BTreeMap::new();
        for category in tracked_categories(self.config, &store) {
            scans.insert(category, scan_category(self.root, self.config, category)?);
        }

        self.enter(Stage::Validating);
        let mut findings = config_findings(self.config);
        for (category, scan) in &scans {
            self.check_entries(*category, scan, &mut findings);
            check_parity(*category, scan, &store, &mut findings);
        }

        let live: BTreeSet<ContentRef> = scans
            .iter()
            .flat_map(|(c, scan)| scan.entries.iter().map(|e| ContentRef::new(*c, e.id.clone())))
            .filter(|r| store.contains(r))
            .collect();
        findings.extend(validate_references(self.root, &store, &live));

        let counts: BTreeMap<Category, usize> = store
            .categories()
            .into_iter()
            .filter(|c| self.config.category(*c).is_some())
            .map(|c| (c, store.count(c)))
            .collect();
        findings.extend(check_docs(self.root, &self.config.docs, &counts));

        findings.sort_by(|a, b| {
            (a.severity, a.category, &a.id, &a.message).cmp(&(b.severity, b.category, &b.id, &b.message))
        });
        Ok(findings)
    }

    fn check_entries(&self, category: Category, scan: &ScanOutcome, findings: &mut Vec<ValidationFinding>) {
        for id in &scan.collisions {
            findings.push(
                ValidationFinding::warning(format!("duplicate id collision, skipped: {id}"))
                    .in_category(category)
                    .for_id(id.clone())
                    .with_fix("rename one of the entries so their names differ by more than case"),
            );
        }
        for entry in &scan.entries {
            // Same read the extractor does, so anything sync would skip fails here.
            if let Err(e) = std::fs::read_to_string(self.root.join(&entry.path)) {
                findings.push(
                    ValidationFinding::error(format!("unreadable descriptor: {}: {e}", entry.path))
                        .in_category(category)
                        .for_id(entry.id.clone())
                        .with_fix(format!("make {} readable", entry.path)),
                );
            }
        }
    }
}

/// Config problems gate the run like any other finding.
fn config_findings(config: &Config) -> Vec<ValidationFinding> {
    config
        .validate()
        .into_iter()
        .map(|w| {
            let finding = match w.level {
                WarnLevel::Error => ValidationFinding::error(w.message),
                WarnLevel::Warning => ValidationFinding::warning(w.message),
            };
            finding
                .at(paths::CONFIG_FILE)
                .with_fix("run `skillkit config validate` and fix the reported entries")
        })
        .collect()
}

/// Disk/manifest parity, checked per manifest file: missing, orphaned, and duplicate records.
fn check_parity(
    category: Category,
    scan: &ScanOutcome,
    store: &ManifestStore,
    findings: &mut Vec<ValidationFinding>,
) {
    let disk = scan.ids();
    for file in store.files_for(category) {
        let ids = file.doc.ids(category);
        let missing: Vec<&String> = disk.difference(&ids).collect();
        let orphaned: Vec<&String> = ids.difference(&disk).collect();

        for id in &missing {
            findings.push(
                ValidationFinding::error(format!("missing: {id}"))
                    .in_category(category)
                    .for_id(id.as_str())
                    .at(file.rel_path.clone())
                    .with_fix(format!(
                        "{SYNC_HINT} to add {} missing {category} entries",
                        missing.len()
                    )),
            );
        }
        for id in &orphaned {
            findings.push(
                ValidationFinding::error(format!("orphaned: {id}"))
                    .in_category(category)
                    .for_id(id.as_str())
                    .at(file.rel_path.clone())
                    .with_fix(format!(
                        "{SYNC_HINT} to remove {} orphaned {category} entries",
                        orphaned.len()
                    )),
            );
        }
        for id in file.doc.duplicates(category) {
            findings.push(
                ValidationFinding::error(format!("duplicate record: {id}"))
                    .in_category(category)
                    .for_id(id)
                    .at(file.rel_path.clone())
                    .with_fix(format!("{SYNC_HINT} to keep the first record")),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

/// Human-readable report grouped by severity, one line per finding.
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for result in &report.reconciled {
        if result.is_noop() && result.skipped.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "synced {}: +{} -{} ={}",
            result.category,
            result.added.len(),
            result.removed.len(),
            result.unchanged.len()
        ));
        if !result.skipped.is_empty() {
            out.push_str(&format!(" (skipped {})", result.skipped.len()));
        }
        out.push('\n');
    }

    let errors: Vec<_> = report.errors().collect();
    let warnings: Vec<_> = report.warnings().collect();
    for (title, group) in [("errors", &errors), ("warnings", &warnings)] {
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("{title} ({}):\n", group.len()));
        for finding in group {
            out.push_str(&format!("  {finding}\n"));
        }
    }

    let verdict = if report.pass { "passed" } else { "failed" };
    out.push_str(&format!(
        "validation {verdict}: {} error(s), {} warning(s)\n",
        errors.len(),
        warnings.len()
    ));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
