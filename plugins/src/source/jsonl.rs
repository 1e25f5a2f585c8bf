//! Local JSON-lines manifests.
//!
//! One JSON object per line. Image fields (`image`, `target_image`) may be a
//! path (relative paths resolve against the manifest's directory), an object
//! with base64 `bytes` or a `path`, or a nested numeric array.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine;
use serde_json::Value;
use vistask_core::convert::extract::{IMAGE_KEY, TARGET_IMAGE_KEY};
use vistask_core::error::SourceError;
use vistask_core::{FieldValue, Record, RecordSource};

use super::pixels::pixels_from_nested;

pub struct JsonlRecordSource {
    path: PathBuf,
    base_dir: PathBuf,
    lines: Lines<BufReader<File>>,
    total: usize,
}

impl JsonlRecordSource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let count_reader = BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        );
        let mut total = 0;
        for line in count_reader.lines() {
            if !line?.trim().is_empty() {
                total += 1;
            }
        }

        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            lines: BufReader::new(file).lines(),
            total,
        })
    }

    fn parse_line(&self, line: &str) -> Result<Record, SourceError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| SourceError::Malformed(format!("invalid JSON: {e}")))?;
        let Value::Object(map) = value else {
            return Err(SourceError::Malformed("line is not a JSON object".into()));
        };

        let mut record = Record::new();
        for (key, value) in map {
            let field = if key == IMAGE_KEY || key == TARGET_IMAGE_KEY {
                self.image_field(value)?
            } else {
                json_to_field(value)
            };
            record.insert(key, field);
        }
        Ok(record)
    }

    fn image_field(&self, value: Value) -> Result<FieldValue, SourceError> {
        match value {
            Value::String(p) => Ok(FieldValue::Text(self.resolve(&p))),
            Value::Object(obj) => {
                if let Some(Value::String(b64)) = obj.get("bytes") {
                    let bytes = base64::engine::general_purpose::STANDARD
                        .decode(b64)
                        .map_err(|e| SourceError::Malformed(format!("bad base64 image: {e}")))?;
                    return Ok(decode_bytes(bytes));
                }
                match obj.get("path") {
                    Some(Value::String(p)) => Ok(FieldValue::Text(self.resolve(p))),
                    _ => Ok(FieldValue::Null),
                }
            }
            arr @ Value::Array(_) => {
                let nested = json_to_field(arr);
                Ok(pixels_from_nested(&nested)
                    .map(FieldValue::Pixels)
                    .unwrap_or(nested))
            }
            other => Ok(json_to_field(other)),
        }
    }

    fn resolve(&self, p: &str) -> String {
        let path = Path::new(p);
        if path.is_absolute() {
            p.to_string()
        } else {
            self.base_dir.join(path).display().to_string()
        }
    }
}

/// Decoded image when the bytes are one, raw bytes otherwise.
pub(crate) fn decode_bytes(bytes: Vec<u8>) -> FieldValue {
    match image::load_from_memory(&bytes) {
        Ok(img) => FieldValue::Image(img),
        Err(e) => {
            tracing::debug!(error = %e, "embedded bytes are not a decodable image");
            FieldValue::Bytes(bytes)
        }
    }
}

pub(crate) fn json_to_field(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => FieldValue::Text(s),
        Value::Array(items) => FieldValue::List(items.into_iter().map(json_to_field).collect()),
        Value::Object(map) => {
            FieldValue::Map(map.into_iter().map(|(k, v)| (k, json_to_field(v))).collect())
        }
    }
}

impl RecordSource for JsonlRecordSource {
    fn describe(&self) -> String {
        format!("jsonl manifest {}", self.path.display())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }

    fn next_record(&mut self) -> Option<Result<Record, SourceError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(SourceError::Io(e))),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}
