//! Metadata extraction from an entry's descriptor file.
//!
//! The header block is YAML front matter. Anything missing or malformed
//! degrades to defaults; the only failure is not being able to read the file.

use crate::types::{Category, ContentEntry};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;

pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub tags: Vec<String>,
}

impl EntryMetadata {
    pub fn fallback(id: &str) -> Self {
        Self {
            name: id.to_string(),
            description: String::new(),
            version: DEFAULT_VERSION.to_string(),
            category: None,
            tags: Vec::new(),
        }
    }
}

/// Read the entry's descriptor and parse its header.
pub fn extract(project_root: &Path, entry: &ContentEntry) -> std::io::Result<EntryMetadata> {
    let content = std::fs::read_to_string(project_root.join(&entry.path))?;
    Ok(parse_header(&entry.id, &content))
}

/// Text between an opening `---` line and the next `---` line.
fn header_block(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    // Empty header: closing delimiter immediately.
    if rest.starts_with("---") {
        return Some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

pub fn parse_header(id: &str, content: &str) -> EntryMetadata {
    let mut meta = EntryMetadata::fallback(id);
    let Some(block) = header_block(content) else {
        return meta;
    };
    let map: Mapping = match serde_yaml::from_str(block) {
        Ok(Value::Mapping(m)) => m,
        _ => return meta,
    };

    if let Some(name) = scalar(&map, "name").filter(|s| !s.is_empty()) {
        meta.name = name;
    }
    if let Some(description) = scalar(&map, "description") {
        meta.description = description;
    }
    if let Some(version) = scalar(&map, "version").filter(|s| !s.is_empty()) {
        meta.version = version;
    }
    meta.category = scalar(&map, "category").and_then(|c| c.parse().ok());

    let mut tags = list(&map, "tags");
    for trigger in list(&map, "triggers") {
        if !tags.contains(&trigger) {
            tags.push(trigger);
        }
    }
    meta.tags = tags;
    meta
}

/// A scalar field rendered as a trimmed string; numbers and bools included.
fn scalar(map: &Mapping, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A sequence of scalars, or a single comma-separated string.
fn list(map: &Mapping, key: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let items: Vec<String> = match map.get(key) {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    };
    for item in items {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn full_header() {
        let content = r#"---
name: pdf-tools
description: Extract text and tables from PDF files.
version: 2.1.0
category: skill
tags: [pdf, documents]
triggers:
  - extract pdf
  - pdf
---

# PDF Tools
"#;
        let meta = parse_header("pdf-tools", content);
        assert_eq!(meta.name, "pdf-tools");
        assert_eq!(meta.description, "Extract text and tables from PDF files.");
        assert_eq!(meta.version, "2.1.0");
        assert_eq!(meta.category, Some(Category::Skill));
        assert_eq!(meta.tags, vec!["pdf", "documents", "extract pdf"]);
    }

    #[test]
    fn no_header_falls_back() {
        let meta = parse_header("plain", "# Just a heading\n");
        assert_eq!(meta, EntryMetadata::fallback("plain"));
        assert_eq!(meta.version, "1.0.0");
        assert!(meta.description.is_empty());
    }

    #[test]
    fn unterminated_header_falls_back() {
        let meta = parse_header("open", "---\nname: open\ndescription: never closed\n");
        assert_eq!(meta, EntryMetadata::fallback("open"));
    }

    #[test]
    fn malformed_yaml_falls_back() {
        let meta = parse_header("bad", "---\nname: [unclosed\n---\nbody\n");
        assert_eq!(meta, EntryMetadata::fallback("bad"));
    }

    #[test]
    fn numeric_version_is_stringified() {
        let meta = parse_header("n", "---\nversion: 1.2\n---\n");
        assert_eq!(meta.version, "1.2");
    }

    #[test]
    fn comma_separated_tags() {
        let meta = parse_header("t", "---\ntags: git, review , git\n---\n");
        assert_eq!(meta.tags, vec!["git", "review"]);
    }

    #[test]
    fn unknown_category_ignored() {
        let meta = parse_header("c", "---\ncategory: gadget\ndescription: ok\n---\n");
        assert_eq!(meta.category, None);
        assert_eq!(meta.description, "ok");
    }

    #[test]
    fn crlf_header() {
        let meta = parse_header("w", "---\r\ndescription: windows\r\n---\r\n");
        assert_eq!(meta.description, "windows");
    }

    #[test]
    fn empty_header_block() {
        let meta = parse_header("e", "---\n---\nbody\n");
        assert_eq!(meta, EntryMetadata::fallback("e"));
    }

    #[test]
    fn extract_reads_descriptor() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("skills/git")).unwrap();
        std::fs::write(
            dir.path().join("skills/git/SKILL.md"),
            "---\nname: git\ndescription: Git helpers\n---\n",
        )
        .unwrap();
        let entry = ContentEntry {
            category: Category::Skill,
            id: "git".to_string(),
            path: "skills/git/SKILL.md".to_string(),
        };
        let meta = extract(dir.path(), &entry).unwrap();
        assert_eq!(meta.description, "Git helpers");
    }

    #[test]
    fn extract_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let entry = ContentEntry {
            category: Category::Skill,
            id: "gone".to_string(),
            path: "skills/gone/SKILL.md".to_string(),
        };
        assert!(extract(dir.path(), &entry).is_err());
    }
}
