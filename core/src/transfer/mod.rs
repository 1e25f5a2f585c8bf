//! Mirror a local task corpus to and from a remote blob namespace.
//!
//! Transfers are sequential and per-object: a failed object is logged and
//! counted, and the remaining objects are still processed.

pub mod keys;
pub mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::TransferConfig;
use crate::error::TransferError;
pub use keys::{content_type_for, local_path_for, object_key};
pub use store::{ObjectPage, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    pub prefix: String,
    /// Extra attempts per object after the first failure.
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Log a progress line every this many successful objects.
    pub progress_every: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
            progress_every: 10,
        }
    }
}

impl TransferOptions {
    pub fn from_config(cfg: &TransferConfig) -> Self {
        Self {
            prefix: cfg.prefix.clone(),
            max_retries: cfg.max_retries,
            retry_delay: Duration::from_millis(cfg.retry_delay_ms),
            ..Default::default()
        }
    }

    fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Emitted every `progress_every` successful objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub found: usize,
    pub uploaded: usize,
    pub failed: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub found: usize,
    pub downloaded: usize,
    pub failed: Vec<String>,
}

/// Every regular file under `root`, recursively, in sorted order. Symlinks
/// to files are listed; symlinks to directories are not followed.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, TransferError> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|source| TransferError::Walk {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| TransferError::Walk {
                path: dir.clone(),
                source,
            })?;
            let file_type = entry.file_type().map_err(|source| TransferError::Walk {
                path: entry.path(),
                source,
            })?;
            let path = entry.path();
            // Symlinked directories are never descended into.
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Upload every regular file under `root` to `{prefix}{relative path}`.
pub async fn upload_directory(
    store: &dyn ObjectStore,
    root: &Path,
    opts: &TransferOptions,
) -> Result<UploadReport, TransferError> {
    upload_directory_with_progress(store, root, opts, &mut |_| {}).await
}

pub async fn upload_directory_with_progress(
    store: &dyn ObjectStore,
    root: &Path,
    opts: &TransferOptions,
    on_progress: &mut dyn FnMut(TransferProgress),
) -> Result<UploadReport, TransferError> {
    let files = collect_files(root)?;
    let mut report = UploadReport {
        found: files.len(),
        ..Default::default()
    };
    tracing::info!(count = files.len(), store = store.name(), "files to upload");

    for path in files {
        let Ok(relative) = path.strip_prefix(root) else {
            report.failed.push(path);
            continue;
        };
        let key = object_key(&opts.prefix, relative);
        let content_type = content_type_for(&path);

        let result = with_retries(opts, || store.put_file(&key, &path, content_type)).await;
        match result {
            Ok(()) => {
                report.uploaded += 1;
                tracing::debug!(key = %key, "uploaded");
                if report.uploaded % opts.progress_every.max(1) == 0 {
                    tracing::info!("Uploaded {}/{} files", report.uploaded, report.found);
                    on_progress(TransferProgress {
                        done: report.uploaded,
                        total: report.found,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "upload failed");
                report.failed.push(path);
            }
        }
    }
    Ok(report)
}

/// Every key under `prefix`, following pagination to the end.
pub async fn list_all(store: &dyn ObjectStore, prefix: &str) -> Result<Vec<String>, TransferError> {
    let mut keys = Vec::new();
    let mut token = None;
    loop {
        let page = store.list_page(prefix, token.take()).await?;
        keys.extend(page.keys);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(keys)
}

/// Download every object under `prefix` into `dest`, keyed by the part of
/// the key after the prefix.
pub async fn download_prefix(
    store: &dyn ObjectStore,
    dest: &Path,
    opts: &TransferOptions,
) -> Result<DownloadReport, TransferError> {
    download_prefix_with_progress(store, dest, opts, &mut |_| {}).await
}

pub async fn download_prefix_with_progress(
    store: &dyn ObjectStore,
    dest: &Path,
    opts: &TransferOptions,
    on_progress: &mut dyn FnMut(TransferProgress),
) -> Result<DownloadReport, TransferError> {
    let keys = list_all(store, &opts.prefix).await?;
    let mut report = DownloadReport {
        found: keys.len(),
        ..Default::default()
    };
    tracing::info!(count = keys.len(), store = store.name(), "files to download");

    for key in keys {
        let Some(local) = local_path_for(dest, &opts.prefix, &key) else {
            tracing::debug!(key = %key, "skipping directory marker");
            continue;
        };
        if let Some(parent) = local.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(key = %key, error = %e, "cannot create destination directory");
                report.failed.push(key);
                continue;
            }
        }

        let result = with_retries(opts, || store.get_to_file(&key, &local)).await;
        match result {
            Ok(()) => {
                report.downloaded += 1;
                if report.downloaded % opts.progress_every.max(1) == 0 {
                    tracing::info!("Downloaded {}/{} files", report.downloaded, report.found);
                    on_progress(TransferProgress {
                        done: report.downloaded,
                        total: report.found,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "download failed");
                report.failed.push(key);
            }
        }
    }
    Ok(report)
}

async fn with_retries<F, Fut>(opts: &TransferOptions, mut op: F) -> Result<(), TransferError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<(), TransferError>>,
{
    let attempts = opts.max_attempts();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                tracing::debug!(attempt, error = %e, "retrying");
                attempt += 1;
                tokio::time::sleep(opts.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
