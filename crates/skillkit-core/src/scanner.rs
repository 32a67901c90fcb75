//! Content scanner: lists the entries of one category from its content root.
//!
//! The walk is one directory level deep and read-only. Output is sorted by
//! id (byte order) so that diffs and reports are reproducible.

use crate::config::{CategoryConfig, Config, EntryLayout};
use crate::error::Result;
use crate::io::relative_display;
use crate::types::{Category, ContentEntry};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Index-like files that sit next to file-layout entries without being one.
const INDEX_FILES: &[&str] = &["README", "INDEX", "index"];

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOutcome {
    pub entries: Vec<ContentEntry>,
    /// Ids dropped because they collide case-insensitively with an earlier id.
    pub collisions: Vec<String>,
}

impl ScanOutcome {
    pub fn ids(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ContentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// Scan the configured root of `category`. An unconfigured category or a
/// missing root yields an empty outcome.
pub fn scan_category(project_root: &Path, config: &Config, category: Category) -> Result<ScanOutcome> {
    match config.category(category) {
        Some(cat) => scan(project_root, category, cat, &config.reserved),
        None => Ok(ScanOutcome::default()),
    }
}

pub fn scan(
    project_root: &Path,
    category: Category,
    cat: &CategoryConfig,
    reserved: &[String],
) -> Result<ScanOutcome> {
    let content_root = project_root.join(&cat.root);
    if !content_root.is_dir() {
        tracing::debug!(%category, root = %content_root.display(), "content root absent");
        return Ok(ScanOutcome::default());
    }

    let mut found: Vec<(String, String)> = Vec::new();
    for entry in std::fs::read_dir(&content_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || reserved.iter().any(|r| *r == name) {
            continue;
        }
        let path = entry.path();

        match &cat.layout {
            EntryLayout::Directory { descriptor } => {
                if !path.is_dir() {
                    continue;
                }
                let descriptor_path = path.join(descriptor);
                // No descriptor: work in progress, not our concern.
                if !descriptor_path.is_file() {
                    continue;
                }
                found.push((name, relative_display(project_root, &descriptor_path)));
            }
            EntryLayout::File { extension } => {
                if !path.is_file() {
                    continue;
                }
                if path.extension().and_then(|e| e.to_str()) != Some(extension.as_str()) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if INDEX_FILES.contains(&stem) || reserved.iter().any(|r| r == stem) {
                    continue;
                }
                found.push((stem.to_string(), relative_display(project_root, &path)));
            }
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));

    let mut outcome = ScanOutcome::default();
    let mut folded = BTreeSet::new();
    for (id, path) in found {
        if !folded.insert(id.to_lowercase()) {
            outcome.collisions.push(id);
            continue;
        }
        outcome.entries.push(ContentEntry { category, id, path });
    }
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
