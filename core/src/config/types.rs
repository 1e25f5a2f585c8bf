use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Diagnostics go to stderr and/or a per-tool log file; user-facing progress
/// and summaries always go to stdout regardless of these settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub console: bool,

    #[serde(default)]
    pub file: bool,

    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Where log files go. Defaults to `$TMP/vistask-logs`.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Emit one warning per record the converter skips.
    #[serde(default = "default_true")]
    pub skipped_records: bool,
}

fn default_true() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl LoggingConfig {
    /// Both sinks off means no subscriber is installed at all.
    pub fn is_silent(&self) -> bool {
        !self.console && !self.file
    }

    pub fn log_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join("vistask-logs"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: false,
            level: default_logging_level(),
            directory: None,
            skipped_records: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default = "default_split")]
    pub split: String,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub limit: Option<usize>,

    /// `lenient` (image or text goal + metadata) or `strict` (both frames).
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_dataset() -> String {
    "videothinkbench".to_string()
}

fn default_split() -> String {
    "test".to_string()
}

fn default_output() -> String {
    "data/questions".to_string()
}

fn default_schema() -> String {
    "lenient".to_string()
}

fn default_progress_every() -> usize {
    10
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            split: default_split(),
            output: default_output(),
            limit: None,
            schema: default_schema(),
            progress_every: default_progress_every(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    #[serde(default)]
    pub prefix: String,

    /// Extra attempts per object after the first failure.
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// S3-compatible endpoint override (MinIO, R2, ...).
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            endpoint: None,
            region: None,
        }
    }
}
