use crate::output::{print_json, print_table};
use anyhow::Context;
use serde::Serialize;
use skillkit_core::config::Config;
use skillkit_core::manifest::ManifestStore;
use skillkit_core::reconcile::tracked_categories;
use skillkit_core::scanner::scan_category;
use skillkit_core::types::Category;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize)]
struct CategoryStatus {
    category: Category,
    on_disk: usize,
    /// Record count per manifest file covering the category.
    manifests: BTreeMap<String, usize>,
    in_sync: bool,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let store = ManifestStore::open(root, &config).context("failed to load manifests")?;

    let mut statuses = Vec::new();
    for category in tracked_categories(&config, &store) {
        let scan = scan_category(root, &config, category)
            .with_context(|| format!("failed to scan {category} entries"))?;
        let disk = scan.ids();
        let mut manifests = BTreeMap::new();
        let mut in_sync = true;
        for file in store.files_for(category) {
            let ids = file.doc.ids(category);
            in_sync &= ids == disk && file.doc.duplicates(category).is_empty();
            manifests.insert(file.rel_path.clone(), file.doc.records(category).len());
        }
        statuses.push(CategoryStatus {
            category,
            on_disk: disk.len(),
            manifests,
            in_sync,
        });
    }

    if json {
        return print_json(&statuses);
    }

    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| {
            let manifests = if s.manifests.is_empty() {
                "(no manifest)".to_string()
            } else {
                s.manifests
                    .iter()
                    .map(|(path, n)| format!("{path}={n}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                s.category.to_string(),
                s.on_disk.to_string(),
                if s.in_sync { "yes" } else { "no" }.to_string(),
                manifests,
            ]
        })
        .collect();
    print_table(&["CATEGORY", "ON DISK", "IN SYNC", "MANIFESTS"], &rows);
    Ok(())
}
