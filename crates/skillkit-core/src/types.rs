use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "skills")]
    Skill,
    #[serde(alias = "mcps", alias = "mcp-server", alias = "mcp_server")]
    Mcp,
    #[serde(alias = "playbooks")]
    Playbook,
    #[serde(alias = "standards")]
    Standard,
    #[serde(alias = "components")]
    Component,
    #[serde(alias = "integrations")]
    Integration,
    #[serde(alias = "utils")]
    Util,
    #[serde(alias = "tools")]
    Tool,
    #[serde(alias = "templates")]
    Template,
    #[serde(alias = "examples")]
    Example,
    #[serde(alias = "schemas")]
    Schema,
    #[serde(alias = "installers")]
    Installer,
    #[serde(alias = "scripts")]
    Script,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Skill,
            Category::Mcp,
            Category::Playbook,
            Category::Standard,
            Category::Component,
            Category::Integration,
            Category::Util,
            Category::Tool,
            Category::Template,
            Category::Example,
            Category::Schema,
            Category::Installer,
            Category::Script,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Skill => "skill",
            Category::Mcp => "mcp",
            Category::Playbook => "playbook",
            Category::Standard => "standard",
            Category::Component => "component",
            Category::Integration => "integration",
            Category::Util => "util",
            Category::Tool => "tool",
            Category::Template => "template",
            Category::Example => "example",
            Category::Schema => "schema",
            Category::Installer => "installer",
            Category::Script => "script",
        }
    }

    /// Plural labels that prose uses when quoting a count of this category,
    /// longest first so "mcp servers" wins over "mcps".
    pub fn count_labels(self) -> &'static [&'static str] {
        match self {
            Category::Skill => &["skills"],
            Category::Mcp => &["mcp servers", "mcps"],
            Category::Playbook => &["playbooks"],
            Category::Standard => &["standards"],
            Category::Component => &["components"],
            Category::Integration => &["integrations"],
            Category::Util => &["utilities", "utils"],
            Category::Tool => &["tools"],
            Category::Template => &["templates"],
            Category::Example => &["examples"],
            Category::Schema => &["schemas"],
            Category::Installer => &["installers"],
            Category::Script => &["scripts"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::SkillkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" | "skills" => Ok(Category::Skill),
            "mcp" | "mcps" | "mcp-server" | "mcp_server" => Ok(Category::Mcp),
            "playbook" | "playbooks" => Ok(Category::Playbook),
            "standard" | "standards" => Ok(Category::Standard),
            "component" | "components" => Ok(Category::Component),
            "integration" | "integrations" => Ok(Category::Integration),
            "util" | "utils" => Ok(Category::Util),
            "tool" | "tools" => Ok(Category::Tool),
            "template" | "templates" => Ok(Category::Template),
            "example" | "examples" => Ok(Category::Example),
            "schema" | "schemas" => Ok(Category::Schema),
            "installer" | "installers" => Ok(Category::Installer),
            "script" | "scripts" => Ok(Category::Script),
            _ => Err(crate::error::SkillkitError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ContentRef
// ---------------------------------------------------------------------------

/// A `(category, id)` pointer from one record to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef {
    pub category: Category,
    pub id: String,
}

impl ContentRef {
    pub fn new(category: Category, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}

// ---------------------------------------------------------------------------
// ContentEntry
// ---------------------------------------------------------------------------

/// One unit of content found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEntry {
    pub category: Category,
    pub id: String,
    /// Descriptor file, relative to the project root, `/`-separated.
    pub path: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
