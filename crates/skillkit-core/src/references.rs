//! Cross-reference checks over the merged manifest view.
//!
//! Must run after reconciliation in fix mode, otherwise references into
//! entries that are about to be removed would still resolve.

use crate::finding::ValidationFinding;
use crate::manifest::{ManifestRecord, ManifestStore};
use crate::types::{Category, ContentRef};
use std::collections::BTreeSet;
use std::path::Path;

/// Lower-cased descriptions that are scaffolding text, not content.
const PLACEHOLDERS: &[&str] = &[
    "todo",
    "tbd",
    "tba",
    "fixme",
    "placeholder",
    "description",
    "description goes here",
    "add description here",
    "add a description",
    "short description",
    "...",
];

pub fn validate_references(
    root: &Path,
    store: &ManifestStore,
    live: &BTreeSet<ContentRef>,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for category in store.categories() {
        for record in store.records(category) {
            check_edges(category, record, store, live, &mut findings);
            check_description(category, record, &mut findings);
            check_path(root, category, record, &mut findings);
        }
    }
    findings
}

fn check_edges(
    category: Category,
    record: &ManifestRecord,
    store: &ManifestStore,
    live: &BTreeSet<ContentRef>,
    findings: &mut Vec<ValidationFinding>,
) {
    let source = ContentRef::new(category, record.name.clone());
    for (kind, target) in record.references() {
        let detail = if !store.contains(target) {
            "not in any manifest"
        } else if !live.contains(target) {
            "target is orphaned"
        } else {
            continue;
        };
        findings.push(
            ValidationFinding::error(format!(
                "dangling reference {} -> {} ({source} {kind} {target}, {detail})",
                record.name, target.id
            ))
            .in_category(category)
            .for_id(record.name.clone())
            .with_fix(format!("remove dangling reference from {source} to {target}")),
        );
    }
}

fn check_description(category: Category, record: &ManifestRecord, findings: &mut Vec<ValidationFinding>) {
    let description = record.description.trim();
    if description.is_empty() {
        findings.push(
            ValidationFinding::warning(format!("empty description: {category}/{}", record.name))
                .in_category(category)
                .for_id(record.name.clone())
                .with_fix("add a description to the entry's header block"),
        );
    } else if is_placeholder(description) {
        findings.push(
            ValidationFinding::warning(format!(
                "placeholder description: {category}/{} ({description:?})",
                record.name
            ))
            .in_category(category)
            .for_id(record.name.clone())
            .with_fix("replace the placeholder with a real description"),
        );
    }
}

fn check_path(root: &Path, category: Category, record: &ManifestRecord, findings: &mut Vec<ValidationFinding>) {
    if record.path.is_empty() {
        findings.push(
            ValidationFinding::warning(format!("no path recorded: {category}/{}", record.name))
                .in_category(category)
                .for_id(record.name.clone()),
        );
    } else if !root.join(&record.path).is_file() {
        findings.push(
            ValidationFinding::warning(format!("stale path: {}", record.path))
                .in_category(category)
                .for_id(record.name.clone())
                .with_fix("point the record's path at the entry's descriptor file"),
        );
    }
}

pub fn is_placeholder(description: &str) -> bool {
    let lower = description.trim().to_lowercase();
    if PLACEHOLDERS.contains(&lower.as_str()) || lower.starts_with("todo:") {
        return true;
    }
    // "[Description]", "[Skill Name] helps with ..."
    lower.starts_with('[') && lower.contains(']')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
