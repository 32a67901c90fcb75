pub mod config;
pub mod docs;
pub mod error;
pub mod extract;
pub mod finding;
pub mod hook;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod reconcile;
pub mod references;
pub mod scanner;
pub mod types;
pub mod validate;

pub use error::{Result, SkillkitError};
