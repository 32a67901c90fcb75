pub mod config;
pub mod hook;
pub mod init;
pub mod list;
pub mod status;
pub mod validate;

/// Returned when the run itself succeeded but the registries did not pass.
/// `main` maps it to exit code 1; every other error exits with 2.
#[derive(Debug, thiserror::Error)]
#[error("validation failed")]
pub struct ValidationFailed;
