//! Field extraction with fallback chains.

use crate::record::{FieldValue, Record};

pub const IMAGE_KEY: &str = "image";
pub const TARGET_IMAGE_KEY: &str = "target_image";
pub const PROMPT_KEYS: [&str; 2] = ["question", "prompt"];
pub const GOAL_TEXT_KEYS: [&str; 2] = ["answer", "target_text"];
pub const DOMAIN_KEYS: [&str; 2] = ["task_type", "category"];

pub const DEFAULT_PROMPT: &str = "Solve this visual reasoning task.";

/// Trimmed instruction text, falling back to a generic prompt.
pub fn prompt(record: &Record) -> String {
    record
        .first_truthy(&PROMPT_KEYS)
        .map(FieldValue::to_string)
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
        .trim()
        .to_string()
}

/// Trimmed goal text, if any non-blank one is present.
pub fn goal_text(record: &Record) -> Option<String> {
    record
        .first_truthy(&GOAL_TEXT_KEYS)
        .map(|v| v.to_string().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn domain(record: &Record, fallback: &str) -> String {
    record
        .first_truthy(&DOMAIN_KEYS)
        .map(FieldValue::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
