use crate::error::{Result, SkillkitError};
use crate::paths;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// EntryLayout
// ---------------------------------------------------------------------------

/// How a category's entries sit under its content root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryLayout {
    /// One subdirectory per entry, identified by a descriptor file inside it.
    Directory { descriptor: String },
    /// One file per entry; the id is the file stem.
    File {
        #[serde(default = "default_extension")]
        extension: String,
    },
}

fn default_extension() -> String {
    "md".to_string()
}

// ---------------------------------------------------------------------------
// CategoryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Content root, relative to the project root.
    pub root: String,
    pub layout: EntryLayout,
}

impl CategoryConfig {
    pub fn directory(root: &str, descriptor: &str) -> Self {
        Self {
            root: root.to_string(),
            layout: EntryLayout::Directory {
                descriptor: descriptor.to_string(),
            },
        }
    }

    pub fn file(root: &str, extension: &str) -> Self {
        Self {
            root: root.to_string(),
            layout: EntryLayout::File {
                extension: extension.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Registry file, relative to the project root.
    pub path: String,
    /// Categories this file indexes.
    pub categories: Vec<Category>,
}

impl ManifestConfig {
    pub fn covers(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Entry names that are scaffolding, never content.
    #[serde(default = "default_reserved")]
    pub reserved: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<Category, CategoryConfig>,
    #[serde(default = "default_manifests")]
    pub manifests: Vec<ManifestConfig>,
    /// Prose documents scanned for entry counts.
    #[serde(default = "default_docs")]
    pub docs: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn default_reserved() -> Vec<String> {
    vec![paths::TEMPLATE_PLACEHOLDER.to_string()]
}

fn default_categories() -> BTreeMap<Category, CategoryConfig> {
    let mut m = BTreeMap::new();
    m.insert(
        Category::Skill,
        CategoryConfig::directory("skills", "SKILL.md"),
    );
    m.insert(
        Category::Mcp,
        CategoryConfig::directory("mcp-servers", "README.md"),
    );
    m.insert(Category::Playbook, CategoryConfig::file("playbooks", "md"));
    m.insert(Category::Standard, CategoryConfig::file("standards", "md"));
    m
}

fn default_manifests() -> Vec<ManifestConfig> {
    vec![ManifestConfig {
        path: paths::DEFAULT_MANIFEST.to_string(),
        categories: vec![
            Category::Skill,
            Category::Mcp,
            Category::Playbook,
            Category::Standard,
        ],
    }]
}

fn default_docs() -> Vec<String> {
    vec![paths::DEFAULT_README.to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            reserved: default_reserved(),
            categories: default_categories(),
            manifests: default_manifests(),
            docs: default_docs(),
        }
    }
}

impl Config {
    /// Load `.skillkit/config.yaml`, falling back to the built-in layout
    /// when the project has none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        serde_yaml::from_str(&data).map_err(|e| SkillkitError::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.get(&category)
    }

    /// Configured categories, in `Category` order.
    pub fn configured(&self) -> Vec<Category> {
        self.categories.keys().copied().collect()
    }

    pub fn manifests_for(&self, category: Category) -> Vec<&ManifestConfig> {
        self.manifests.iter().filter(|m| m.covers(category)).collect()
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r == name)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (category, cat) in &self.categories {
            if cat.root.trim().is_empty() || !paths::is_contained(&cat.root) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "category '{category}' root '{}' must be a relative path inside the project",
                        cat.root
                    ),
                });
            }
            if let EntryLayout::Directory { descriptor } = &cat.layout {
                if descriptor.trim().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("category '{category}' has an empty descriptor name"),
                    });
                }
            }
            if self.manifests_for(*category).is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "category '{category}' is not indexed by any manifest"
                    ),
                });
            }
        }

        let mut seen = BTreeSet::new();
        for manifest in &self.manifests {
            if !seen.insert(manifest.path.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("manifest '{}' is declared twice", manifest.path),
                });
            }
            if !paths::is_contained(&manifest.path) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "manifest '{}' must be a relative path inside the project",
                        manifest.path
                    ),
                });
            }
            for category in &manifest.categories {
                if !self.categories.contains_key(category) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!(
                            "manifest '{}' indexes category '{category}' which has no content root",
                            manifest.path
                        ),
                    });
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
