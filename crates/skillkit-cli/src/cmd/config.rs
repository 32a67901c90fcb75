use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use skillkit_core::config::{Config, EntryLayout, WarnLevel};
use skillkit_core::paths;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults applied)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }

    let source = if paths::config_path(root).exists() {
        paths::CONFIG_FILE
    } else {
        "built-in defaults"
    };
    println!("Config:     {source}");
    println!("Reserved:   {}", config.reserved.join(", "));
    println!("Categories:");
    for (category, cat) in &config.categories {
        let layout = match &cat.layout {
            EntryLayout::Directory { descriptor } => format!("<dir>/{descriptor}"),
            EntryLayout::File { extension } => format!("<file>.{extension}"),
        };
        println!("  {:<12} {}/{layout}", category.as_str(), cat.root);
    }
    println!("Manifests:");
    for m in &config.manifests {
        let cats: Vec<&str> = m.categories.iter().map(|c| c.as_str()).collect();
        println!("  {:<24} {}", m.path, cats.join(", "));
    }
    if config.docs.is_empty() {
        println!("Docs:       (none)");
    } else {
        println!("Docs:       {}", config.docs.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
