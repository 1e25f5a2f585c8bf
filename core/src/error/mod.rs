#[allow(clippy::module_inception)]
pub mod error;
pub mod record;
pub mod transfer;

pub use error::{CliError, ConfigError};
pub use record::{RecordError, SourceError};
pub use transfer::TransferError;
