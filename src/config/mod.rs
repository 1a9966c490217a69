//! Configuration loading and types.
//!
//! Settings live in a TOML file; every section is optional and falls back
//! to defaults.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ListConfig, MockConfig, MockCredential, UnlockConfig};
