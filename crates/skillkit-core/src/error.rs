use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillkitError {
    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    #[error("manifest {} is not valid JSON: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("config {} is not valid YAML: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("hook already exists at {}: pass --force to overwrite", .0.display())]
    HookExists(PathBuf),

    #[error("not a git repository: {} has no .git directory", .0.display())]
    NotAGitRepo(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillkitError>;
