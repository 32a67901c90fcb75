use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use skillkit_core::config::Config;
use skillkit_core::manifest::{ManifestRecord, ManifestStore};
use skillkit_core::types::Category;
use std::path::Path;

/// Entries come from the registries only; there is no built-in list to
/// fall back on.
pub fn run(root: &Path, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let store = ManifestStore::open(root, &config).context("failed to load manifests")?;

    let categories = match category {
        Some(raw) => {
            let c: Category = raw.parse().with_context(|| format!("unknown category: {raw}"))?;
            vec![c]
        }
        None => store.categories(),
    };

    // Stamp the category so JSON consumers see it even on hand-written
    // records that omit it.
    let listed: Vec<ManifestRecord> = categories
        .iter()
        .flat_map(|&c| {
            store.records(c).into_iter().map(move |r| ManifestRecord {
                category: Some(c),
                ..r.clone()
            })
        })
        .collect();

    if json {
        return print_json(&listed);
    }

    if listed.is_empty() {
        eprintln!("No registered entries. Run `skillkit sync` to build the registries.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = listed
        .iter()
        .map(|l| {
            vec![
                l.category.map(|c| c.to_string()).unwrap_or_default(),
                l.name.clone(),
                l.version.clone(),
                truncate(&l.description, 60),
            ]
        })
        .collect();
    print_table(&["CATEGORY", "NAME", "VERSION", "DESCRIPTION"], &rows);
    Ok(())
}
