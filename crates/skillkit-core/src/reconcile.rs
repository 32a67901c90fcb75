//! Reconciliation: make every manifest's entry set equal the disk's.
//!
//! Disk is authoritative. Entries on disk but absent from a covering file are
//! added (copied from a sibling file when one already has the record,
//! otherwise built from the descriptor). Entries in a file but not on disk are
//! removed. Records present everywhere are left untouched.

use crate::config::Config;
use crate::error::Result;
use crate::extract::extract;
use crate::manifest::{ManifestRecord, ManifestStore};
use crate::scanner::scan_category;
use crate::types::Category;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileResult {
    pub category: Category,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
    pub collisions: Vec<String>,
}

impl ReconcileResult {
    fn new(category: Category) -> Self {
        Self {
            category,
            added: Vec::new(),
            removed: Vec::new(),
            unchanged: Vec::new(),
            skipped: Vec::new(),
            collisions: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Reconcile one category in memory. Nothing is written; call
/// [`ManifestStore::save_changed`] afterwards.
pub fn reconcile(
    root: &Path,
    config: &Config,
    store: &mut ManifestStore,
    category: Category,
) -> Result<ReconcileResult> {
    let scan = scan_category(root, config, category)?;
    let mut result = ReconcileResult::new(category);
    result.collisions = scan.collisions.clone();

    if store.files_for(category).next().is_none() {
        tracing::debug!(%category, "no manifest covers category, nothing to reconcile");
        result.unchanged = scan.entries.iter().map(|e| e.id.clone()).collect();
        return Ok(result);
    }

    let disk = scan.ids();

    // Collapse duplicate records within a file; the first one wins.
    for file in store.files_for_mut(category) {
        if file.doc.duplicates(category).is_empty() {
            continue;
        }
        let mut seen = BTreeSet::new();
        file.doc
            .records_mut(category)
            .retain(|r| seen.insert(r.name.clone()));
    }

    let per_file: Vec<BTreeSet<String>> = store
        .files_for(category)
        .map(|f| f.doc.ids(category))
        .collect();
    let union: BTreeSet<String> = per_file.iter().flatten().cloned().collect();

    for id in &disk {
        if per_file.iter().all(|ids| ids.contains(id)) {
            result.unchanged.push(id.clone());
            continue;
        }
        let record = match store.record(category, id) {
            Some(existing) => existing.clone(),
            None => {
                let Some(entry) = scan.get(id) else {
                    continue;
                };
                match extract(root, entry) {
                    Ok(meta) => ManifestRecord::from_entry(entry, meta),
                    Err(e) => {
                        tracing::warn!(%category, %id, error = %e, "descriptor unreadable, skipping");
                        result.skipped.push(SkippedEntry {
                            id: id.clone(),
                            reason: format!("{}: {e}", entry.path),
                        });
                        continue;
                    }
                }
            }
        };
        for file in store.files_for_mut(category) {
            if file.doc.record(category, id).is_none() {
                file.doc.records_mut(category).push(record.clone());
            }
        }
        result.added.push(id.clone());
    }

    result.removed = union.difference(&disk).cloned().collect();

    let added: BTreeSet<&String> = result.added.iter().collect();
    let removed: BTreeSet<&String> = result.removed.iter().collect();
    for file in store.files_for_mut(category) {
        let Some(records) = file.doc.categories.get_mut(&category) else {
            continue;
        };
        let before = records.len();
        records.retain(|r| !removed.contains(&r.name));
        let touched = records.len() != before || records.iter().any(|r| added.contains(&r.name));
        if touched {
            records.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    tracing::debug!(
        %category,
        added = result.added.len(),
        removed = result.removed.len(),
        unchanged = result.unchanged.len(),
        "reconciled"
    );
    Ok(result)
}

/// Reconcile one category and persist the covering manifests.
pub fn reconcile_category(root: &Path, config: &Config, category: Category) -> Result<ReconcileResult> {
    let mut store = ManifestStore::open(root, config)?;
    let result = reconcile(root, config, &mut store, category)?;
    store.save_changed()?;
    Ok(result)
}

/// Categories with a content root plus categories some manifest indexes.
/// A category without a root scans as empty, so its records are orphans.
pub fn tracked_categories(config: &Config, store: &ManifestStore) -> Vec<Category> {
    let mut categories: BTreeSet<Category> = config.configured().into_iter().collect();
    categories.extend(store.categories());
    categories.into_iter().collect()
}

/// Reconcile every tracked category, then persist changed manifests once.
pub fn reconcile_all(root: &Path, config: &Config) -> Result<Vec<ReconcileResult>> {
    let mut store = ManifestStore::open(root, config)?;
    let mut results = Vec::new();
    for category in tracked_categories(config, &store) {
        results.push(reconcile(root, config, &mut store, category)?);
    }
    store.save_changed()?;
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
