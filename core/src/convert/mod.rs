//! Dataset Converter: upstream records in, task directories out.
//!
//! Records are processed strictly one after another. A record that cannot be
//! converted is logged with its index and skipped; it never stops the run.

pub mod dataset;
pub mod extract;

use std::path::{Path, PathBuf};

use crate::config::ConvertConfig;
use crate::error::{ConfigError, RecordError};
use crate::imaging::{normalize_field, ColorMode};
use crate::record::{Record, RecordSource};
use crate::task::{build_metadata, task_id, Goal, Task, TaskWriter};
use crate::validate::{describe, Schema, TaskFields};
pub use dataset::{DatasetProfile, KNOWN_DATASETS, VIDEO_THINK_BENCH};

/// Tracing target of the per-record skip warnings, so they can be filtered
/// on their own.
pub const SKIPPED_RECORDS_TARGET: &str = "vistask::skipped";

/// Knobs of one conversion run. Defaults match [`ConvertConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub split: String,
    pub output_root: PathBuf,
    /// Only the first `limit` records are considered. `Some(0)` means no
    /// limit.
    pub limit: Option<usize>,
    pub schema: Schema,
    /// Report progress after this many successful conversions.
    pub progress_every: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            split: "test".to_string(),
            output_root: PathBuf::from("data/questions"),
            limit: None,
            schema: Schema::Lenient,
            progress_every: 10,
        }
    }
}

impl ConvertOptions {
    pub fn from_config(cfg: &ConvertConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            split: cfg.split.clone(),
            output_root: PathBuf::from(&cfg.output),
            limit: cfg.limit,
            schema: cfg.schema.parse()?,
            progress_every: cfg.progress_every,
        })
    }

    /// The record cap actually applied; a zero limit is treated as unset.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }

    /// How many records a run will consider, given the source's size hint.
    pub fn planned_total(&self, len_hint: Option<usize>) -> Option<usize> {
        match (len_hint, self.effective_limit()) {
            (Some(n), Some(limit)) => Some(n.min(limit)),
            (n, None) => n,
            (None, limit) => limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub attempted: usize,
    pub converted: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Progress notification passed to the callback installed with
/// [`Converter::on_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based index of the record that just converted.
    pub index: usize,
    pub converted: usize,
    pub total: Option<usize>,
}

pub struct Converter<'a> {
    profile: &'a DatasetProfile,
    options: ConvertOptions,
    writer: TaskWriter,
    progress: Option<Box<dyn FnMut(Progress) + 'a>>,
}

impl<'a> Converter<'a> {
    pub fn new(profile: &'a DatasetProfile, options: ConvertOptions) -> Self {
        let writer = TaskWriter::new(options.output_root.clone());
        Self {
            profile,
            options,
            writer,
            progress: None,
        }
    }

    pub fn on_progress(mut self, f: impl FnMut(Progress) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn output_root(&self) -> &Path {
        self.writer.root()
    }

    /// Drain `source` (up to the configured limit) and persist every valid
    /// task.
    pub fn run(&mut self, source: &mut dyn RecordSource) -> ConversionReport {
        let total = self.options.planned_total(source.len_hint());
        let limit = self.options.effective_limit();
        tracing::info!(
            source = %source.describe(),
            split = %self.options.split,
            schema = %self.options.schema,
            total = ?total,
            "processing samples"
        );

        let mut report = ConversionReport::default();
        let every = self.options.progress_every.max(1);

        for index in 0.. {
            if limit.is_some_and(|limit| index >= limit) {
                break;
            }
            let Some(next) = source.next_record() else {
                break;
            };
            report.attempted += 1;

            let outcome = next
                .map_err(RecordError::from)
                .and_then(|record| self.convert_record(record, index));
            match outcome {
                Ok(_) => {
                    report.converted += 1;
                    if report.converted % every == 0 {
                        tracing::info!(index, converted = report.converted, "progress");
                        if let Some(cb) = self.progress.as_mut() {
                            cb(Progress {
                                index,
                                converted: report.converted,
                                total,
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(target: SKIPPED_RECORDS_TARGET, index, reason = %e, "skipping record");
                    report.skipped.push(SkippedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            converted = report.converted,
            attempted = report.attempted,
            "conversion finished"
        );
        report
    }

    /// Convert one record; returns the task directory written.
    pub fn convert_record(
        &self,
        mut record: Record,
        index: usize,
    ) -> Result<PathBuf, RecordError> {
        let first_frame = normalize_field(record.take(extract::IMAGE_KEY), ColorMode::Rgb)
            .ok_or(RecordError::MissingFirstFrame)?;
        let prompt = extract::prompt(&record);
        let final_frame = normalize_field(record.take(extract::TARGET_IMAGE_KEY), ColorMode::Rgb);
        let domain = extract::domain(&record, self.profile.fallback_domain);
        let task_id = task_id(self.profile.tag, &self.options.split, index);

        let task = match self.options.schema {
            Schema::Lenient => {
                let goal_text = extract::goal_text(&record);
                let metadata = build_metadata(
                    &domain,
                    &task_id,
                    self.profile.source,
                    &self.options.split,
                    &record,
                );
                let fields = TaskFields {
                    first_frame: Some(&first_frame),
                    prompt: &prompt,
                    final_frame: final_frame.as_ref(),
                    goal_text: goal_text.as_deref(),
                    metadata: Some(&metadata),
                };
                let violations = Schema::Lenient.check(&fields);
                if !violations.is_empty() {
                    return Err(RecordError::Validation(describe(&violations)));
                }
                let goal = match (final_frame, goal_text) {
                    (Some(img), _) => Goal::Frame(img),
                    (None, Some(text)) => Goal::Text(text),
                    (None, None) => {
                        return Err(RecordError::Validation("no goal".to_string()));
                    }
                };
                Task {
                    domain,
                    task_id,
                    first_frame,
                    goal,
                    prompt,
                    metadata: Some(metadata),
                }
            }
            Schema::Strict => {
                let final_frame = final_frame.ok_or(RecordError::MissingFinalFrame)?;
                let fields = TaskFields {
                    first_frame: Some(&first_frame),
                    prompt: &prompt,
                    final_frame: Some(&final_frame),
                    ..Default::default()
                };
                let violations = Schema::Strict.check(&fields);
                if !violations.is_empty() {
                    return Err(RecordError::Validation(describe(&violations)));
                }
                Task {
                    domain,
                    task_id,
                    first_frame,
                    goal: Goal::Frame(final_frame),
                    prompt,
                    metadata: None,
                }
            }
        };

        self.writer.write(&task)
    }
}
