use anyhow::Context;
use skillkit_core::config::Config;
use skillkit_core::{hook, io, paths};
use std::path::Path;

pub fn run(root: &Path, install_hook: bool) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let data = serde_yaml::to_string(&Config::default()).context("failed to render config")?;
    let written = io::write_if_missing(&path, data.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if written {
        println!("Created {}", paths::CONFIG_FILE);
    } else {
        println!("{} already exists, left unchanged", paths::CONFIG_FILE);
    }

    if install_hook {
        let hook_path = hook::install_pre_commit(root, false).context("failed to install pre-commit hook")?;
        println!("Installed {}", io::relative_display(root, &hook_path));
    }

    println!("Next: run `skillkit sync` to build the registries from disk.");
    Ok(())
}
