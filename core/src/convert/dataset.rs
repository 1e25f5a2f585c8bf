use crate::error::ConfigError;

/// Everything the converter needs to know about a known upstream dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetProfile {
    /// Name accepted on the command line (matched case-insensitively).
    pub name: &'static str,
    /// Hugging Face hub repository.
    pub repo_id: &'static str,
    /// Short tag leading every task id.
    pub tag: &'static str,
    /// Identifier written to `metadata.source`.
    pub source: &'static str,
    /// Domain used when a record carries neither `task_type` nor `category`.
    pub fallback_domain: &'static str,
}

pub const VIDEO_THINK_BENCH: DatasetProfile = DatasetProfile {
    name: "videothinkbench",
    repo_id: "video-think-bench/VideoThinkBench",
    tag: "vtb",
    source: "video-think-bench/VideoThinkBench",
    fallback_domain: "videothinkbench",
};

pub const KNOWN_DATASETS: &[DatasetProfile] = &[VIDEO_THINK_BENCH];

impl DatasetProfile {
    pub fn lookup(name: &str) -> Result<&'static DatasetProfile, ConfigError> {
        KNOWN_DATASETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigError::UnknownDataset {
                name: name.to_string(),
                available: KNOWN_DATASETS
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
