use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SKILLKIT_DIR: &str = ".skillkit";
pub const CONFIG_FILE: &str = ".skillkit/config.yaml";

pub const GIT_DIR: &str = ".git";
pub const GIT_HOOKS_DIR: &str = ".git/hooks";
pub const PRE_COMMIT_HOOK: &str = ".git/hooks/pre-commit";

pub const DEFAULT_MANIFEST: &str = "registry.json";
pub const DEFAULT_README: &str = "README.md";

/// Placeholder directory shipped as scaffolding, never real content.
pub const TEMPLATE_PLACEHOLDER: &str = "_TEMPLATE";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn skillkit_dir(root: &Path) -> PathBuf {
    root.join(SKILLKIT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn git_dir(root: &Path) -> PathBuf {
    root.join(GIT_DIR)
}

pub fn git_hooks_dir(root: &Path) -> PathBuf {
    root.join(GIT_HOOKS_DIR)
}

pub fn pre_commit_hook_path(root: &Path) -> PathBuf {
    root.join(PRE_COMMIT_HOOK)
}

/// True when `rel` stays inside the project: relative, no `..` components.
pub fn is_contained(rel: &str) -> bool {
    let p = Path::new(rel);
    !p.is_absolute()
        && !p
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contained_paths() {
        for rel in ["skills", "content/skills", "./standards"] {
            assert!(is_contained(rel), "expected contained: {rel}");
        }
    }

    #[test]
    fn escaping_paths() {
        for rel in ["/etc", "../elsewhere", "skills/../../x"] {
            assert!(!is_contained(rel), "expected escaping: {rel}");
        }
    }
}
