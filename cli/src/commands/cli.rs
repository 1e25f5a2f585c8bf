use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vistask_core::Schema;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaArg {
    /// Metadata required; goal may be a final frame or goal text.
    Lenient,
    /// Final frame required; no metadata.
    Strict,
}

impl From<SchemaArg> for Schema {
    fn from(value: SchemaArg) -> Self {
        match value {
            SchemaArg::Lenient => Schema::Lenient,
            SchemaArg::Strict => Schema::Strict,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    Download,
}

/// Download a visual-reasoning dataset and convert it into task directories.
#[derive(Parser, Debug)]
#[command(name = "vistask-convert", version)]
pub struct ConvertArgs {
    /// Dataset name [default: videothinkbench]
    #[arg(long)]
    pub dataset: Option<String>,

    /// Dataset split [default: test]
    #[arg(long)]
    pub split: Option<String>,

    /// Output root [default: data/questions]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Convert at most this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Read records from a local JSON-lines manifest instead of the hub.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Upload a task corpus to, or download it from, an object store.
#[derive(Parser, Debug)]
#[command(name = "vistask-transfer", version)]
pub struct TransferArgs {
    #[arg(long, value_enum)]
    pub action: Action,

    /// Local directory to upload.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Local directory to download into.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Bucket name, or `file://<dir>` for a directory-backed store.
    #[arg(long)]
    pub bucket: String,

    /// Key prefix [default: ""]
    #[arg(long)]
    pub prefix: Option<String>,

    /// S3-compatible endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Check the layout of every task directory under a corpus root.
#[derive(Parser, Debug)]
#[command(name = "vistask-check", version)]
pub struct CheckArgs {
    /// Corpus root [default: the configured conversion output]
    #[arg(long)]
    pub root: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}
