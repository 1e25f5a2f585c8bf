//! A plain directory standing in for a bucket (`file://` targets, tests).

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use vistask_core::error::TransferError;
use vistask_core::transfer::{collect_files, object_key, ObjectPage, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

pub struct LocalObjectStore {
    root: PathBuf,
    page_size: usize,
    name: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("file://{}", root.display());
        Self {
            root,
            page_size: DEFAULT_PAGE_SIZE,
            name,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn object_path(&self, key: &str) -> Option<PathBuf> {
        let rel = Path::new(key);
        if key.is_empty() || rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), TransferError> {
        let target = self.object_path(key).ok_or_else(|| TransferError::Upload {
            path: path.to_path_buf(),
            key: key.to_string(),
            message: "key does not map to a file".to_string(),
        })?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(path, &target).await?;
        tracing::debug!(key, content_type, "stored");
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ObjectPage, TransferError> {
        if !self.root.is_dir() {
            return Ok(ObjectPage::default());
        }
        let mut keys: Vec<String> = collect_files(&self.root)?
            .iter()
            .filter_map(|p| p.strip_prefix(&self.root).ok())
            .map(|rel| object_key("", rel))
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();

        // Keys sort lexicographically, so the token is the last key served.
        let start = match continuation {
            Some(after) => keys.partition_point(|k| k.as_str() <= after.as_str()),
            None => 0,
        };
        let end = (start + self.page_size).min(keys.len());
        let next = (end < keys.len()).then(|| keys[end - 1].clone());
        Ok(ObjectPage {
            keys: keys[start..end].to_vec(),
            next,
        })
    }

    async fn get_to_file(&self, key: &str, dest: &Path) -> Result<(), TransferError> {
        let source = self.object_path(key).ok_or_else(|| TransferError::Download {
            key: key.to_string(),
            path: dest.to_path_buf(),
            message: "key does not map to a file".to_string(),
        })?;
        tokio::fs::copy(&source, dest)
            .await
            .map_err(|e| TransferError::Download {
                key: key.to_string(),
                path: dest.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistask_core::transfer::{download_prefix, list_all, upload_directory, TransferOptions};

    #[tokio::test]
    async fn pages_cover_every_key_once() {
        let bucket = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(bucket.path().join(format!("k{i}.txt")), b"x").unwrap();
        }
        let store = LocalObjectStore::new(bucket.path()).with_page_size(2);

        let first = store.list_page("", None).await.unwrap();
        assert_eq!(first.keys, vec!["k0.txt", "k1.txt"]);
        assert_eq!(first.next.as_deref(), Some("k1.txt"));

        let all = list_all(&store, "").await.unwrap();
        assert_eq!(all, vec!["k0.txt", "k1.txt", "k2.txt", "k3.txt", "k4.txt"]);
    }

    #[tokio::test]
    async fn mirrors_a_task_tree() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("maze_task/vtb_test_00001")).unwrap();
        std::fs::write(src.path().join("maze_task/vtb_test_00001/prompt.txt"), b"go").unwrap();
        std::fs::write(src.path().join("maze_task/vtb_test_00001/goal.txt"), b"up").unwrap();

        let bucket = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(bucket.path());
        let opts = TransferOptions {
            prefix: "datasets/".into(),
            ..Default::default()
        };

        let up = upload_directory(&store, src.path(), &opts).await.unwrap();
        assert_eq!(up.uploaded, 2);
        assert!(bucket
            .path()
            .join("datasets/maze_task/vtb_test_00001/goal.txt")
            .is_file());

        let dest = tempfile::tempdir().unwrap();
        let down = download_prefix(&store, dest.path(), &opts).await.unwrap();
        assert_eq!(down.downloaded, 2);
        assert_eq!(
            std::fs::read_to_string(dest.path().join("maze_task/vtb_test_00001/prompt.txt"))
                .unwrap(),
            "go"
        );
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let bucket = tempfile::tempdir().unwrap();
        let src = bucket.path().join("f.txt");
        std::fs::write(&src, b"x").unwrap();
        let store = LocalObjectStore::new(bucket.path().join("b"));
        assert!(store.put_file("../escape", &src, "text/plain").await.is_err());
    }

    #[tokio::test]
    async fn missing_bucket_lists_nothing() {
        let bucket = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(bucket.path().join("absent"));
        assert!(list_all(&store, "").await.unwrap().is_empty());
    }
}
