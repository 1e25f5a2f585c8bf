use std::path::Path;

use super::types::AppConfig;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "vistask.toml";

/// Load `./vistask.toml` if present, otherwise built-in defaults.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        load_from(local)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
