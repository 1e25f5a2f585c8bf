#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};
use vistask_core::error::TransferError;
use vistask_core::transfer::{ObjectPage, ObjectStore};
use vistask_core::FieldValue;

pub fn solid_frame(w: u32, h: u32, color: [u8; 3]) -> FieldValue {
    FieldValue::Image(DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(color))))
}

/// Keys and bodies held in memory; listing pages are `page_size` long so
/// pagination is exercised.
pub struct MemoryStore {
    pub objects: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
    pub page_size: usize,
    /// Keys whose upload/download always fails.
    pub poisoned: Vec<String>,
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size,
            poisoned: Vec::new(),
        }
    }

    pub fn insert(&self, key: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            (body.to_vec(), "application/octet-stream".to_string()),
        );
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.lock().unwrap().get(key).map(|(_, ct)| ct.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), TransferError> {
        if self.poisoned.iter().any(|k| k == key) {
            return Err(TransferError::Upload {
                path: path.to_path_buf(),
                key: key.to_string(),
                message: "poisoned".to_string(),
            });
        }
        let body = std::fs::read(path)?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ObjectPage, TransferError> {
        let objects = self.objects.lock().unwrap();
        let matching: Vec<&String> = objects.keys().filter(|k| k.starts_with(prefix)).collect();
        let start: usize = continuation.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(matching.len());
        Ok(ObjectPage {
            keys: matching[start..end].iter().map(|k| k.to_string()).collect(),
            next: (end < matching.len()).then(|| end.to_string()),
        })
    }

    async fn get_to_file(&self, key: &str, dest: &Path) -> Result<(), TransferError> {
        if self.poisoned.iter().any(|k| k == key) {
            return Err(TransferError::Download {
                key: key.to_string(),
                path: dest.to_path_buf(),
                message: "poisoned".to_string(),
            });
        }
        let body = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(b, _)| b.clone())
            .unwrap_or_default();
        std::fs::write(dest, body)?;
        Ok(())
    }
}

pub fn relative_files(root: &Path) -> Vec<PathBuf> {
    vistask_core::transfer::collect_files(root)
        .unwrap()
        .into_iter()
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect()
}
