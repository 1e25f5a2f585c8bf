use thiserror::Error;

use super::transfer::TransferError;

/// Problems detected before any work starts. Reported to the user; the
/// requested operation never begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown dataset '{name}'\nAvailable datasets: {available}")]
    UnknownDataset { name: String, available: String },
    #[error("{flag} required for {action}")]
    MissingFlag {
        flag: &'static str,
        action: &'static str,
    },
    #[error("Input directory does not exist: {0}")]
    MissingInput(String),
    #[error("Manifest file does not exist: {0}")]
    MissingManifest(String),
    #[error("unknown schema '{0}' (expected lenient or strict)")]
    UnknownSchema(String),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Configuration problems end the process normally after the message is
    /// printed; everything else is a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 0,
            CliError::Logging(_) => 11,
            CliError::Transfer(_) | CliError::Io(_) => 20,
            CliError::Anyhow(_) => 50,
        }
    }
}
