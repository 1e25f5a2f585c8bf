//! Task Validator.
//!
//! Two schemas coexist and are never merged:
//!
//! * `Lenient`: first frame, prompt, a goal (final frame or goal text) and a
//!   metadata mapping carrying `domain`, `task_id` and `source`. On disk:
//!   `first_frame.png`, `prompt.txt`, `question_metadata.json` and one of
//!   `final_frame.png` / `goal.txt`.
//! * `Strict`: first frame, prompt and final frame; metadata is not checked.
//!   On disk: `first_frame.png`, `prompt.txt`, `final_frame.png`.

pub mod layout;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
pub use layout::{
    FINAL_FRAME_FILE, FIRST_FRAME_FILE, GOAL_FILE, METADATA_FILE, PROMPT_FILE,
    REQUIRED_METADATA_KEYS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    #[default]
    Lenient,
    Strict,
}

impl Schema {
    pub fn as_str(self) -> &'static str {
        match self {
            Schema::Lenient => "lenient",
            Schema::Strict => "strict",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Schema::Lenient),
            "strict" => Ok(Schema::Strict),
            _ => Err(ConfigError::UnknownSchema(s.to_string())),
        }
    }
}

/// Borrowed view of a candidate task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFields<'a> {
    pub first_frame: Option<&'a DynamicImage>,
    pub prompt: &'a str,
    pub final_frame: Option<&'a DynamicImage>,
    pub goal_text: Option<&'a str>,
    pub metadata: Option<&'a Map<String, Value>>,
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingFirstFrame,
    EmptyPrompt,
    MissingGoal,
    MissingFinalFrame,
    MissingMetadata,
    MissingMetadataKey(&'static str),
    NotADirectory,
    MissingFile(&'static str),
    MissingGoalFile,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingFirstFrame => f.write_str("first frame is missing"),
            Violation::EmptyPrompt => f.write_str("prompt is empty"),
            Violation::MissingGoal => f.write_str("neither final frame nor goal text present"),
            Violation::MissingFinalFrame => f.write_str("final frame is missing"),
            Violation::MissingMetadata => f.write_str("metadata is missing or empty"),
            Violation::MissingMetadataKey(k) => write!(f, "metadata lacks '{k}'"),
            Violation::NotADirectory => f.write_str("not a directory"),
            Violation::MissingFile(name) => write!(f, "{name} is missing"),
            Violation::MissingGoalFile => {
                write!(f, "neither {FINAL_FRAME_FILE} nor {GOAL_FILE} present")
            }
        }
    }
}

/// Join violations into one line for logs.
pub fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Schema {
    /// Every rule the candidate fails. Empty means valid.
    pub fn check(self, fields: &TaskFields<'_>) -> Vec<Violation> {
        let mut out = Vec::new();
        if fields.first_frame.is_none() {
            out.push(Violation::MissingFirstFrame);
        }
        if fields.prompt.trim().is_empty() {
            out.push(Violation::EmptyPrompt);
        }

        match self {
            Schema::Lenient => {
                let has_text = fields.goal_text.is_some_and(|t| !t.trim().is_empty());
                if fields.final_frame.is_none() && !has_text {
                    out.push(Violation::MissingGoal);
                }
                match fields.metadata {
                    Some(meta) if !meta.is_empty() => {
                        for key in REQUIRED_METADATA_KEYS {
                            if !meta.contains_key(key) {
                                out.push(Violation::MissingMetadataKey(key));
                            }
                        }
                    }
                    _ => out.push(Violation::MissingMetadata),
                }
            }
            Schema::Strict => {
                if fields.final_frame.is_none() {
                    out.push(Violation::MissingFinalFrame);
                }
            }
        }
        out
    }

    pub fn validate(self, fields: &TaskFields<'_>) -> bool {
        self.check(fields).is_empty()
    }

    /// Structural check of an on-disk task directory. Only file presence is
    /// inspected; contents are never opened.
    pub fn check_dir(self, dir: &Path) -> Vec<Violation> {
        if !dir.is_dir() {
            return vec![Violation::NotADirectory];
        }

        let required: &[&'static str] = match self {
            Schema::Lenient => &[FIRST_FRAME_FILE, PROMPT_FILE, METADATA_FILE],
            Schema::Strict => &[FIRST_FRAME_FILE, PROMPT_FILE, FINAL_FRAME_FILE],
        };
        let mut out: Vec<Violation> = required
            .iter()
            .filter(|name| !dir.join(name).is_file())
            .map(|name| Violation::MissingFile(*name))
            .collect();

        if self == Schema::Lenient
            && !dir.join(FINAL_FRAME_FILE).is_file()
            && !dir.join(GOAL_FILE).is_file()
        {
            out.push(Violation::MissingGoalFile);
        }
        out
    }

    pub fn validate_dir(self, dir: &Path) -> bool {
        self.check_dir(dir).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use serde_json::json;

    fn frame() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
    }

    fn meta() -> Map<String, Value> {
        json!({"domain": "maze", "task_id": "vtb_test_00000", "source": "x"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn lenient_accepts_text_goal_with_required_metadata() {
        let first = frame();
        let meta = meta();
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "Solve it",
            goal_text: Some("42"),
            metadata: Some(&meta),
            ..Default::default()
        };
        assert!(Schema::Lenient.validate(&fields));
    }

    #[test]
    fn whitespace_prompt_fails_both_schemas() {
        let first = frame();
        let last = frame();
        let meta = meta();
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "  \n\t",
            final_frame: Some(&last),
            goal_text: Some("42"),
            metadata: Some(&meta),
        };
        assert!(!Schema::Lenient.validate(&fields));
        assert!(!Schema::Strict.validate(&fields));
    }

    #[test]
    fn strict_requires_final_frame_even_with_text_goal() {
        let first = frame();
        let meta = meta();
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "Solve it",
            goal_text: Some("42"),
            metadata: Some(&meta),
            ..Default::default()
        };
        assert_eq!(
            Schema::Strict.check(&fields),
            vec![Violation::MissingFinalFrame]
        );
    }

    #[test]
    fn strict_ignores_metadata() {
        let first = frame();
        let last = frame();
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "Solve it",
            final_frame: Some(&last),
            ..Default::default()
        };
        assert!(Schema::Strict.validate(&fields));
        assert!(!Schema::Lenient.validate(&fields));
    }

    #[test]
    fn lenient_reports_each_missing_metadata_key() {
        let first = frame();
        let mut meta = meta();
        meta.remove("source");
        meta.remove("task_id");
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "Solve it",
            goal_text: Some("42"),
            metadata: Some(&meta),
            ..Default::default()
        };
        assert_eq!(
            Schema::Lenient.check(&fields),
            vec![
                Violation::MissingMetadataKey("task_id"),
                Violation::MissingMetadataKey("source"),
            ]
        );
    }

    #[test]
    fn multiple_failures_are_still_just_invalid() {
        let fields = TaskFields::default();
        let violations = Schema::Lenient.check(&fields);
        assert!(violations.len() >= 3);
        assert!(!Schema::Lenient.validate(&fields));
        assert!(!Schema::Strict.validate(&fields));
    }

    #[test]
    fn blank_goal_text_is_not_a_goal() {
        let first = frame();
        let meta = meta();
        let fields = TaskFields {
            first_frame: Some(&first),
            prompt: "Solve it",
            goal_text: Some("   "),
            metadata: Some(&meta),
            ..Default::default()
        };
        assert_eq!(Schema::Lenient.check(&fields), vec![Violation::MissingGoal]);
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn dir_check_on_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(!Schema::Lenient.validate_dir(&missing));
        assert!(!Schema::Strict.validate_dir(&missing));

        let file = dir.path().join("file");
        std::fs::write(&file, b"").unwrap();
        assert_eq!(Schema::Lenient.check_dir(&file), vec![Violation::NotADirectory]);
    }

    #[test]
    fn lenient_dir_accepts_either_goal_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &[FIRST_FRAME_FILE, PROMPT_FILE, METADATA_FILE]);
        assert_eq!(
            Schema::Lenient.check_dir(dir.path()),
            vec![Violation::MissingGoalFile]
        );

        touch(dir.path(), &[GOAL_FILE]);
        assert!(Schema::Lenient.validate_dir(dir.path()));
        assert!(!Schema::Strict.validate_dir(dir.path()));
    }

    #[test]
    fn each_required_file_matters() {
        let all = [FIRST_FRAME_FILE, PROMPT_FILE, METADATA_FILE, FINAL_FRAME_FILE];
        for skip in [FIRST_FRAME_FILE, PROMPT_FILE, METADATA_FILE] {
            let dir = tempfile::tempdir().unwrap();
            let names: Vec<&str> = all.iter().copied().filter(|n| *n != skip).collect();
            touch(dir.path(), &names);
            assert_eq!(
                Schema::Lenient.check_dir(dir.path()),
                vec![Violation::MissingFile(skip)]
            );
        }

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &[FIRST_FRAME_FILE, PROMPT_FILE]);
        assert_eq!(
            Schema::Strict.check_dir(dir.path()),
            vec![Violation::MissingFile(FINAL_FRAME_FILE)]
        );
    }

    #[test]
    fn directory_named_like_required_file_does_not_count() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &[FIRST_FRAME_FILE, PROMPT_FILE]);
        std::fs::create_dir(dir.path().join(FINAL_FRAME_FILE)).unwrap();
        assert!(!Schema::Strict.validate_dir(dir.path()));
    }

    #[test]
    fn schema_parses_case_insensitively() {
        assert_eq!("Strict".parse::<Schema>().unwrap(), Schema::Strict);
        assert_eq!(" lenient ".parse::<Schema>().unwrap(), Schema::Lenient);
        assert!("loose".parse::<Schema>().is_err());
    }
}
