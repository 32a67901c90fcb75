//! Documentation drift: entry counts quoted in prose vs. the registry.
//!
//! Deliberately conservative. Only a number directly followed by a known
//! plural label is a claim ("12 Skills", "3/14 tools"); anything else in the
//! prose is ignored. Mismatches are warnings, never errors.

use crate::finding::ValidationFinding;
use crate::types::Category;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

static CLAIM_RE: OnceLock<Regex> = OnceLock::new();

fn claim_re() -> &'static Regex {
    CLAIM_RE.get_or_init(|| {
        let mut labels: Vec<&str> = Category::all()
            .iter()
            .flat_map(|c| c.count_labels().iter().copied())
            .collect();
        labels.sort_by_key(|l| std::cmp::Reverse(l.len()));
        let alternation = labels
            .iter()
            .map(|l| l.split(' ').map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\b(\d+)(?:\s*/\s*(\d+))?\s+({alternation})\b");
        Regex::new(&pattern).expect("claim pattern is built from static labels")
    })
}

fn category_for_label(label: &str) -> Option<Category> {
    let normalized = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    Category::all()
        .iter()
        .copied()
        .find(|c| c.count_labels().contains(&normalized.as_str()))
}

/// A labelled count found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountClaim {
    pub line: usize,
    pub category: Category,
    pub label: String,
    pub claimed: usize,
}

/// Every labelled count in `content`, skipping fenced code blocks.
pub fn extract_claims(content: &str) -> Vec<CountClaim> {
    let mut claims = Vec::new();
    let mut in_fence = false;
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        for caps in claim_re().captures_iter(line) {
            // "N/M label": M is the claimed total.
            let number = caps.get(2).or_else(|| caps.get(1));
            let Some(claimed) = number.and_then(|m| m.as_str().parse::<usize>().ok()) else {
                continue;
            };
            let label = caps[3].to_string();
            let Some(category) = category_for_label(&label) else {
                continue;
            };
            claims.push(CountClaim {
                line: idx + 1,
                category,
                label,
                claimed,
            });
        }
    }
    claims
}

/// Compare the claims in one document against live counts. Only categories
/// present in `counts` are checked.
pub fn check_text(doc: &str, content: &str, counts: &BTreeMap<Category, usize>) -> Vec<ValidationFinding> {
    extract_claims(content)
        .into_iter()
        .filter_map(|claim| {
            let actual = *counts.get(&claim.category)?;
            if actual == claim.claimed {
                return None;
            }
            let location = format!("{doc}:{}", claim.line);
            Some(
                ValidationFinding::warning(format!(
                    "{location} claims {} {}, registry has {actual}",
                    claim.claimed, claim.label
                ))
                .in_category(claim.category)
                .at(location.clone())
                .with_fix(format!("update {location} to say {actual} {}", claim.label)),
            )
        })
        .collect()
}

pub fn check_docs(
    root: &Path,
    docs: &[String],
    counts: &BTreeMap<Category, usize>,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for doc in docs {
        let path = root.join(doc);
        if !path.is_file() {
            tracing::debug!(doc = %doc, "document not found, skipping count check");
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => findings.extend(check_text(doc, &content, counts)),
            Err(e) => findings.push(
                ValidationFinding::warning(format!("could not read {doc}: {e}")).at(doc.clone()),
            ),
        }
    }
    findings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
