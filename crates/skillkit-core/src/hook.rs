use crate::error::{Result, SkillkitError};
use crate::io::atomic_write;
use crate::paths;
use std::path::{Path, PathBuf};

/// Marker line identifying hooks written by this tool.
pub const HOOK_MARKER: &str = "# installed by skillkit";

/// Set to any non-empty value to let commits through when `skillkit` is not
/// installed.
pub const ALLOW_MISSING_ENV: &str = "SKILLKIT_HOOK_ALLOW_MISSING";

pub fn pre_commit_script() -> String {
    format!(
        "#!/bin/sh\n\
         {HOOK_MARKER}\n\
         # Blocks the commit when registries drift from the content tree.\n\
         if ! command -v skillkit >/dev/null 2>&1; then\n\
         \x20 if [ -n \"${ALLOW_MISSING_ENV}\" ]; then\n\
         \x20   echo \"skillkit not found on PATH; skipping registry validation\" >&2\n\
         \x20   exit 0\n\
         \x20 fi\n\
         \x20 echo \"skillkit not found on PATH; install it or set {ALLOW_MISSING_ENV}=1 to skip\" >&2\n\
         \x20 exit 1\n\
         fi\n\
         exec skillkit validate\n"
    )
}

/// Write `.git/hooks/pre-commit`. An existing hook not written by us is only
/// replaced with `force`.
pub fn install_pre_commit(root: &Path, force: bool) -> Result<PathBuf> {
    if !paths::git_dir(root).is_dir() {
        return Err(SkillkitError::NotAGitRepo(root.to_path_buf()));
    }
    let path = paths::pre_commit_hook_path(root);
    if path.exists() && !force {
        let existing = std::fs::read_to_string(&path).unwrap_or_default();
        if !existing.contains(HOOK_MARKER) {
            return Err(SkillkitError::HookExists(path));
        }
    }
    atomic_write(&path, pre_commit_script().as_bytes())?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
