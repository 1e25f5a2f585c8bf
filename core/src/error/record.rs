use thiserror::Error;

/// Failure reading one record from an upstream source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Why a single record produced no task directory.
///
/// Every variant is recoverable at the record boundary: the converter logs it
/// with the record index and moves on.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid first frame")]
    MissingFirstFrame,
    #[error("Invalid final frame")]
    MissingFinalFrame,
    #[error("Data validation failed: {0}")]
    Validation(String),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("failed to write task files: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to encode metadata: {0}")]
    Json(#[from] serde_json::Error),
}
