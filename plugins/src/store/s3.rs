use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use vistask_core::error::TransferError;
use vistask_core::transfer::{ObjectPage, ObjectStore};

/// An S3 (or S3-compatible) bucket. Credentials come from the standard AWS
/// provider chain.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    name: String,
}

impl S3ObjectStore {
    pub async fn connect(bucket: &str, endpoint: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::with_client(Client::from_conf(builder.build()), bucket)
    }

    pub fn with_client(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            name: format!("s3://{bucket}"),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), TransferError> {
        let upload_err = |message: String| TransferError::Upload {
            path: path.to_path_buf(),
            key: key.to_string(),
            message,
        };
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| upload_err(e.to_string()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| upload_err(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ObjectPage, TransferError> {
        let out = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| TransferError::List {
                prefix: prefix.to_string(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        let keys = out
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect();
        let next = if out.is_truncated().unwrap_or(false) {
            out.next_continuation_token().map(str::to_string)
        } else {
            None
        };
        Ok(ObjectPage { keys, next })
    }

    async fn get_to_file(&self, key: &str, dest: &Path) -> Result<(), TransferError> {
        let download_err = |message: String| TransferError::Download {
            key: key.to_string(),
            path: dest.to_path_buf(),
            message,
        };
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| download_err(DisplayErrorContext(e).to_string()))?;
        let bytes = resp
            .body
            .collect()
            .await
            .map_err(|e| download_err(e.to_string()))?
            .into_bytes();
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }
}
