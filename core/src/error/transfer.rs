use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to list objects under '{prefix}': {message}")]
    List { prefix: String, message: String },
    #[error("failed to upload {path} to '{key}': {message}")]
    Upload {
        path: PathBuf,
        key: String,
        message: String,
    },
    #[error("failed to download '{key}' to {path}: {message}")]
    Download {
        key: String,
        path: PathBuf,
        message: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
