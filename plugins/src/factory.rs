use std::path::Path;

use anyhow::Result;

use vistask_core::config::TransferConfig;
use vistask_core::convert::DatasetProfile;
use vistask_core::record::RecordSource;
use vistask_core::transfer::ObjectStore;

use crate::source::{HubParquetSource, JsonlRecordSource};
use crate::store::{LocalObjectStore, S3ObjectStore};

const LOCAL_BUCKET_SCHEME: &str = "file://";

/// A local JSONL manifest wins over the hub when one is given.
pub async fn build_source(
    profile: &DatasetProfile,
    split: &str,
    manifest: Option<&Path>,
) -> Result<Box<dyn RecordSource>> {
    match manifest {
        Some(path) => Ok(Box::new(JsonlRecordSource::open(path)?)),
        None => Ok(Box::new(HubParquetSource::open(profile.repo_id, split).await?)),
    }
}

pub async fn build_store(bucket: &str, cfg: &TransferConfig) -> Result<Box<dyn ObjectStore>> {
    if let Some(dir) = bucket.strip_prefix(LOCAL_BUCKET_SCHEME) {
        if dir.is_empty() {
            anyhow::bail!("empty directory in bucket '{bucket}'");
        }
        return Ok(Box::new(LocalObjectStore::new(dir)));
    }

    let name = bucket.strip_prefix("s3://").unwrap_or(bucket).trim_end_matches('/');
    if name.is_empty() {
        anyhow::bail!("bucket name is empty");
    }
    Ok(Box::new(
        S3ObjectStore::connect(name, cfg.endpoint.as_deref(), cfg.region.as_deref()).await,
    ))
}
