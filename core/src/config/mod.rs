pub mod load;
pub mod types;

pub use load::{load_default, load_from, DEFAULT_CONFIG_FILE};
pub use types::{AppConfig, ConvertConfig, LoggingConfig, TransferConfig};
