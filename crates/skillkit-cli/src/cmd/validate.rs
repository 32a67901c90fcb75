use super::ValidationFailed;
use crate::output::print_json;
use anyhow::Context;
use skillkit_core::config::Config;
use skillkit_core::validate::{render_report, Validator};
use std::path::Path;

/// `validate` (check only) and `sync`/`fix` (reconcile, then check).
pub fn run(root: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let report = Validator::new(root, &config)
        .validate(strict)
        .with_context(|| {
            if strict {
                "sync aborted".to_string()
            } else {
                "validation aborted".to_string()
            }
        })?;

    if json {
        print_json(&report)?;
    } else {
        print!("{}", render_report(&report));
    }

    if !report.pass {
        return Err(ValidationFailed.into());
    }
    Ok(())
}
