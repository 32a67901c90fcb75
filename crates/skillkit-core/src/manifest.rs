//! Manifest store: the JSON registries that index content for discovery.
//!
//! A project may declare several registry files that cover overlapping
//! categories. [`ManifestStore`] loads all of them and is the single write
//! path: every change to a category lands in every file that covers it.

use crate::config::{Config, ManifestConfig};
use crate::error::{Result, SkillkitError};
use crate::extract::{EntryMetadata, DEFAULT_VERSION};
use crate::io::{atomic_write, stage_write};
use crate::types::{Category, ContentEntry, ContentRef};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// ManifestRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    #[serde(default = "default_record_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<ContentRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enables: Vec<ContentRef>,
    /// Hand-curated keys this tool does not interpret; kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_record_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ManifestRecord {
    /// A fresh record for an entry that has just appeared on disk.
    pub fn from_entry(entry: &ContentEntry, meta: EntryMetadata) -> Self {
        if meta.name != entry.id {
            tracing::debug!(
                id = %entry.id,
                declared = %meta.name,
                "descriptor name differs from id, using id"
            );
        }
        if let Some(declared) = meta.category.filter(|c| *c != entry.category) {
            tracing::warn!(
                id = %entry.id,
                %declared,
                actual = %entry.category,
                "descriptor declares a different category"
            );
        }
        Self {
            name: entry.id.clone(),
            version: meta.version,
            description: meta.description,
            path: entry.path.clone(),
            tags: meta.tags,
            category: Some(entry.category),
            requires: Vec::new(),
            enables: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Every outgoing edge, labelled with its kind.
    pub fn references(&self) -> impl Iterator<Item = (&'static str, &ContentRef)> {
        self.requires
            .iter()
            .map(|r| ("requires", r))
            .chain(self.enables.iter().map(|r| ("enables", r)))
    }
}

// ---------------------------------------------------------------------------
// ManifestDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    #[serde(default = "default_schema_version")]
    pub version: String,
    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub categories: BTreeMap<Category, Vec<ManifestRecord>>,
    /// Unknown top-level keys, preserved across saves.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_schema_version() -> String {
    MANIFEST_SCHEMA_VERSION.to_string()
}

impl Default for ManifestDocument {
    fn default() -> Self {
        Self {
            version: default_schema_version(),
            last_updated: None,
            categories: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

impl ManifestDocument {
    /// Parse a registry file. A missing file is an empty document so that a
    /// first run can bootstrap; a file that exists but does not parse is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| SkillkitError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Stamp `lastUpdated` and write pretty-printed JSON atomically.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let data = self.render()?;
        atomic_write(path, data.as_bytes())
    }

    fn render(&mut self) -> Result<String> {
        self.last_updated = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        Ok(data)
    }

    pub fn records(&self, category: Category) -> &[ManifestRecord] {
        self.categories
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn records_mut(&mut self, category: Category) -> &mut Vec<ManifestRecord> {
        self.categories.entry(category).or_default()
    }

    pub fn ids(&self, category: Category) -> BTreeSet<String> {
        self.records(category).iter().map(|r| r.name.clone()).collect()
    }

    pub fn record(&self, category: Category, id: &str) -> Option<&ManifestRecord> {
        self.records(category).iter().find(|r| r.name == id)
    }

    /// Names that appear more than once in one category, in first-seen order.
    pub fn duplicates(&self, category: Category) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut dups = Vec::new();
        for r in self.records(category) {
            if !seen.insert(r.name.as_str()) && !dups.contains(&r.name) {
                dups.push(r.name.clone());
            }
        }
        dups
    }
}

// ---------------------------------------------------------------------------
// ManifestFile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ManifestFile {
    /// Path as declared in config, relative to the project root.
    pub rel_path: String,
    pub path: PathBuf,
    pub categories: Vec<Category>,
    pub doc: ManifestDocument,
    loaded: ManifestDocument,
}

impl ManifestFile {
    pub fn open(root: &Path, decl: &ManifestConfig) -> Result<Self> {
        let path = root.join(&decl.path);
        let doc = ManifestDocument::load(&path)?;
        Ok(Self {
            rel_path: decl.path.clone(),
            path,
            categories: decl.categories.clone(),
            loaded: doc.clone(),
            doc,
        })
    }

    pub fn covers(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn is_dirty(&self) -> bool {
        self.doc != self.loaded || !self.path.exists()
    }
}

// ---------------------------------------------------------------------------
// ManifestStore
// ---------------------------------------------------------------------------

/// All declared registry files, read and written as one logical store.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    files: Vec<ManifestFile>,
}

impl ManifestStore {
    pub fn open(root: &Path, config: &Config) -> Result<Self> {
        let files = config
            .manifests
            .iter()
            .map(|decl| ManifestFile::open(root, decl))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { files })
    }

    pub fn files(&self) -> &[ManifestFile] {
        &self.files
    }

    pub fn files_for(&self, category: Category) -> impl Iterator<Item = &ManifestFile> {
        self.files.iter().filter(move |f| f.covers(category))
    }

    pub fn files_for_mut(&mut self, category: Category) -> impl Iterator<Item = &mut ManifestFile> {
        self.files.iter_mut().filter(move |f| f.covers(category))
    }

    /// Categories covered by at least one file, in `Category` order.
    pub fn categories(&self) -> Vec<Category> {
        let set: BTreeSet<Category> = self
            .files
            .iter()
            .flat_map(|f| f.categories.iter().copied())
            .collect();
        set.into_iter().collect()
    }

    /// Union of record names across every file covering `category`.
    pub fn ids(&self, category: Category) -> BTreeSet<String> {
        self.files_for(category)
            .flat_map(|f| f.doc.ids(category))
            .collect()
    }

    pub fn count(&self, category: Category) -> usize {
        self.ids(category).len()
    }

    /// First record for `id` in declaration order of the files.
    pub fn record(&self, category: Category, id: &str) -> Option<&ManifestRecord> {
        self.files_for(category)
            .find_map(|f| f.doc.record(category, id))
    }

    /// Merged view of a category: one record per name, first file wins,
    /// sorted by name.
    pub fn records(&self, category: Category) -> Vec<&ManifestRecord> {
        let mut merged: BTreeMap<&str, &ManifestRecord> = BTreeMap::new();
        for file in self.files_for(category) {
            for r in file.doc.records(category) {
                merged.entry(r.name.as_str()).or_insert(r);
            }
        }
        merged.into_values().collect()
    }

    pub fn contains(&self, target: &ContentRef) -> bool {
        self.record(target.category, &target.id).is_some()
    }

    /// Write every file whose contents changed since it was loaded. Returns
    /// the declared paths of the files written.
    ///
    /// All dirty files are staged before any is replaced, so a failure while
    /// staging leaves every file on disk as it was.
    pub fn save_changed(&mut self) -> Result<Vec<String>> {
        let mut staged = Vec::new();
        for (idx, file) in self.files.iter().enumerate() {
            if !file.is_dirty() {
                continue;
            }
            let mut doc = file.doc.clone();
            let data = doc.render()?;
            staged.push((idx, doc, stage_write(&file.path, data.as_bytes())?));
        }

        let mut written = Vec::new();
        for (idx, doc, tmp) in staged {
            let file = &mut self.files[idx];
            tmp.persist(&file.path).map_err(|e| e.error)?;
            file.loaded = doc.clone();
            file.doc = doc;
            tracing::info!(path = %file.rel_path, "manifest written");
            written.push(file.rel_path.clone());
        }
        Ok(written)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
