//! Hugging Face hub datasets stored as parquet shards.
//!
//! Shards for a split are fetched through the hub cache, then read row by
//! row. Image columns (`struct<bytes: binary, path: string>`) decode to
//! images the same way the `datasets` library presents them.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use arrow::util::display::array_value_to_string;
use arrow_array::cast::AsArray;
use arrow_array::types::{
    Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type, UInt32Type,
    UInt64Type, UInt8Type,
};
use arrow_array::{Array, RecordBatch};
use arrow_schema::DataType;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use vistask_core::convert::extract::{IMAGE_KEY, TARGET_IMAGE_KEY};
use vistask_core::error::SourceError;
use vistask_core::{FieldValue, Record, RecordSource};

use super::jsonl::decode_bytes;
use super::pixels::pixels_from_nested;

const BATCH_SIZE: usize = 64;

pub struct HubParquetSource {
    description: String,
    files: Vec<PathBuf>,
    next_file: usize,
    reader: Option<ParquetRecordBatchReader>,
    batch: Option<(RecordBatch, usize)>,
    total: usize,
}

/// Whether a repository file is a parquet shard of `split`.
///
/// Matches the common layouts: `data/{split}-00000-of-00001.parquet`,
/// `{config}/{split}-0000.parquet` and `{split}/0000.parquet`.
pub fn is_split_shard(rfilename: &str, split: &str) -> bool {
    if !rfilename.ends_with(".parquet") {
        return false;
    }
    let mut parts: Vec<&str> = rfilename.split('/').collect();
    let Some(file) = parts.pop() else {
        return false;
    };
    let stem = file.trim_end_matches(".parquet");
    stem == split || stem.starts_with(&format!("{split}-")) || parts.contains(&split)
}

impl HubParquetSource {
    /// Resolve and download the shards of `split` in `repo_id`.
    pub async fn open(repo_id: &str, split: &str) -> anyhow::Result<Self> {
        let api = hf_hub::api::tokio::Api::new().context("failed to initialise hub client")?;
        let repo = api.dataset(repo_id.to_string());
        let info = repo
            .info()
            .await
            .with_context(|| format!("failed to fetch repository info for {repo_id}"))?;

        let mut shards: Vec<String> = info
            .siblings
            .into_iter()
            .map(|s| s.rfilename)
            .filter(|f| is_split_shard(f, split))
            .collect();
        shards.sort();
        if shards.is_empty() {
            bail!("no parquet shards for split '{split}' in {repo_id}");
        }

        let mut files = Vec::with_capacity(shards.len());
        for shard in &shards {
            tracing::info!(repo = repo_id, shard = %shard, "fetching shard");
            let local = repo
                .get(shard)
                .await
                .with_context(|| format!("failed to download {shard}"))?;
            files.push(local);
        }
        Self::from_files(format!("{repo_id} ({split})"), files)
    }

    /// Read already-downloaded shards.
    pub fn from_files(description: String, files: Vec<PathBuf>) -> anyhow::Result<Self> {
        let mut total = 0usize;
        for path in &files {
            let builder = open_builder(path)?;
            total += usize::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);
        }
        Ok(Self {
            description,
            files,
            next_file: 0,
            reader: None,
            batch: None,
            total,
        })
    }
}

fn open_builder(path: &Path) -> anyhow::Result<ParquetRecordBatchReaderBuilder<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("failed to read parquet metadata of {}", path.display()))
}

impl RecordSource for HubParquetSource {
    fn describe(&self) -> String {
        format!("hub dataset {}", self.description)
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }

    fn next_record(&mut self) -> Option<Result<Record, SourceError>> {
        loop {
            if let Some((batch, row)) = self.batch.as_mut() {
                if *row < batch.num_rows() {
                    let record = row_to_record(batch, *row);
                    *row += 1;
                    return Some(Ok(record));
                }
                self.batch = None;
            }

            if let Some(reader) = self.reader.as_mut() {
                match reader.next() {
                    Some(Ok(batch)) => self.batch = Some((batch, 0)),
                    Some(Err(e)) => {
                        // A broken batch poisons the rest of its shard.
                        self.reader = None;
                        return Some(Err(SourceError::Other(e.into())));
                    }
                    None => self.reader = None,
                }
                continue;
            }

            let path = self.files.get(self.next_file)?.clone();
            self.next_file += 1;
            match open_builder(&path).and_then(|b| {
                b.with_batch_size(BATCH_SIZE)
                    .build()
                    .map_err(anyhow::Error::from)
            }) {
                Ok(reader) => self.reader = Some(reader),
                Err(e) => return Some(Err(SourceError::Other(e))),
            }
        }
    }
}

fn row_to_record(batch: &RecordBatch, row: usize) -> Record {
    let schema = batch.schema();
    let mut record = Record::new();
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let mut value = arrow_value(column.as_ref(), row);
        if field.name() == IMAGE_KEY || field.name() == TARGET_IMAGE_KEY {
            if let Some(pixels) = pixels_from_nested(&value) {
                value = FieldValue::Pixels(pixels);
            }
        }
        record.insert(field.name().as_str(), value);
    }
    record
}

fn arrow_value(array: &dyn Array, row: usize) -> FieldValue {
    if array.is_null(row) {
        return FieldValue::Null;
    }
    match array.data_type() {
        DataType::Null => FieldValue::Null,
        DataType::Boolean => FieldValue::Bool(array.as_boolean().value(row)),
        DataType::Int8 => FieldValue::Int(array.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => FieldValue::Int(array.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => FieldValue::Int(array.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => FieldValue::Int(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => FieldValue::Int(array.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => FieldValue::Int(array.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => FieldValue::Int(array.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = array.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(FieldValue::Int)
                .unwrap_or(FieldValue::Float(v as f64))
        }
        DataType::Float32 => {
            FieldValue::Float(array.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => FieldValue::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => FieldValue::Text(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => FieldValue::Text(array.as_string::<i64>().value(row).to_string()),
        DataType::Binary => FieldValue::Bytes(array.as_binary::<i32>().value(row).to_vec()),
        DataType::LargeBinary => FieldValue::Bytes(array.as_binary::<i64>().value(row).to_vec()),
        DataType::List(_) => list_value(array.as_list::<i32>().value(row).as_ref()),
        DataType::LargeList(_) => list_value(array.as_list::<i64>().value(row).as_ref()),
        DataType::Struct(_) => struct_value(array, row),
        _ => match array_value_to_string(array, row) {
            Ok(s) => FieldValue::Text(s),
            Err(e) => {
                tracing::debug!(error = %e, "unrenderable column value");
                FieldValue::Null
            }
        },
    }
}

fn list_value(values: &dyn Array) -> FieldValue {
    FieldValue::List((0..values.len()).map(|i| arrow_value(values, i)).collect())
}

/// Image structs become decoded images (or a path when only the path is
/// set); other structs become maps.
fn struct_value(array: &dyn Array, row: usize) -> FieldValue {
    let s = array.as_struct();
    let bytes_col = s.column_by_name("bytes");
    let path_col = s.column_by_name("path");

    if let (Some(bytes_col), Some(path_col)) = (bytes_col, path_col) {
        if let FieldValue::Bytes(bytes) = arrow_value(bytes_col.as_ref(), row) {
            return decode_bytes(bytes);
        }
        return match arrow_value(path_col.as_ref(), row) {
            FieldValue::Text(p) => FieldValue::Text(p),
            _ => FieldValue::Null,
        };
    }

    let DataType::Struct(fields) = array.data_type() else {
        return FieldValue::Null;
    };
    FieldValue::Map(
        fields
            .iter()
            .zip(s.columns())
            .map(|(f, col)| (f.name().clone(), arrow_value(col.as_ref(), row)))
            .collect(),
    )
}
