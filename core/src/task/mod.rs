//! The persisted unit: a task and its on-disk directory.

pub mod metadata;
pub mod writer;

use image::DynamicImage;
use serde_json::{Map, Value};

use crate::validate::TaskFields;
pub use metadata::{build_metadata, EXTRA_EXCLUDED_KEYS};
pub use writer::{task_dir, TaskWriter};

/// The goal state of a task.
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    Frame(DynamicImage),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Task {
    pub domain: String,
    pub task_id: String,
    pub first_frame: DynamicImage,
    pub goal: Goal,
    pub prompt: String,
    /// Present only for the lenient layout.
    pub metadata: Option<Map<String, Value>>,
}

impl Task {
    pub fn fields(&self) -> TaskFields<'_> {
        let (final_frame, goal_text) = match &self.goal {
            Goal::Frame(img) => (Some(img), None),
            Goal::Text(text) => (None, Some(text.as_str())),
        };
        TaskFields {
            first_frame: Some(&self.first_frame),
            prompt: &self.prompt,
            final_frame,
            goal_text,
            metadata: self.metadata.as_ref(),
        }
    }
}

/// `{tag}_{split}_{index:05}`, e.g. `vtb_test_00001`.
pub fn task_id(tag: &str, split: &str, index: usize) -> String {
    format!("{tag}_{split}_{index:05}")
}
