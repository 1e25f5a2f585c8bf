pub mod check;
pub mod cli;
pub mod convert;
pub mod transfer;

use std::path::Path;

use vistask_core::config::{self, AppConfig};
use vistask_core::error::ConfigError;

/// `--config` if given, otherwise `./vistask.toml` or built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_default(),
    }
}
