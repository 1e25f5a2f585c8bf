use std::path::Path;

use async_trait::async_trait;

use crate::error::TransferError;

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub keys: Vec<String>,
    /// Continuation token for the next page, if any.
    pub next: Option<String>,
}

/// A flat key -> blob namespace (an S3 bucket or equivalent).
///
/// Each call is atomic at single-object granularity.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;
    async fn put_file(&self, key: &str, path: &Path, content_type: &str)
        -> Result<(), TransferError>;
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ObjectPage, TransferError>;
    async fn get_to_file(&self, key: &str, dest: &Path) -> Result<(), TransferError>;
}
