//! # Configuration
//!
//! Configuration structures and loaders for the Carnet notebook
//! persistence stack. Values come from (in ascending precedence)
//! struct defaults, an optional TOML file, and `NB_*` environment
//! variables.

mod config;
mod file_loader;
mod loader;

pub use config::{Config, ObjectStoreConfig, RetryConfig, validate};
pub use file_loader::load_from_file;
pub use loader::load_from_env;
