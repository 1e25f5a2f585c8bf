use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::{Goal, Task};
use crate::error::RecordError;
use crate::validate::layout::{
    FINAL_FRAME_FILE, FIRST_FRAME_FILE, GOAL_FILE, METADATA_FILE, PROMPT_FILE, TASK_DIR_SUFFIX,
};

/// `{root}/{domain}_task/{task_id}`. Path separators inside the domain are
/// replaced so a domain always maps to exactly one directory level.
pub fn task_dir(root: &Path, domain: &str, task_id: &str) -> PathBuf {
    let domain: String = domain
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    root.join(format!("{domain}{TASK_DIR_SUFFIX}")).join(task_id)
}

/// Persists validated tasks under an output root.
#[derive(Debug, Clone)]
pub struct TaskWriter {
    root: PathBuf,
}

impl TaskWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every file of the task; returns the task directory.
    pub fn write(&self, task: &Task) -> Result<PathBuf, RecordError> {
        let dir = task_dir(&self.root, &task.domain, &task.task_id);
        std::fs::create_dir_all(&dir)?;

        task.first_frame
            .save_with_format(dir.join(FIRST_FRAME_FILE), ImageFormat::Png)?;

        match &task.goal {
            Goal::Frame(img) => img.save_with_format(dir.join(FINAL_FRAME_FILE), ImageFormat::Png)?,
            Goal::Text(text) => std::fs::write(dir.join(GOAL_FILE), text.trim())?,
        }

        std::fs::write(dir.join(PROMPT_FILE), &task.prompt)?;

        if let Some(meta) = &task.metadata {
            let json = serde_json::to_string_pretty(meta)?;
            std::fs::write(dir.join(METADATA_FILE), json)?;
        }

        tracing::debug!(dir = %dir.display(), "task written");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Schema;
    use image::{DynamicImage, RgbImage};
    use serde_json::json;

    fn frame() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(3, 3))
    }

    #[test]
    fn domain_separators_do_not_nest() {
        let dir = task_dir(Path::new("/out"), "a/b", "id");
        assert_eq!(dir, PathBuf::from("/out/a_b_task/id"));
    }

    #[test]
    fn text_goal_task_round_trips_lenient_layout() {
        let out = tempfile::tempdir().unwrap();
        let meta = json!({"domain": "maze", "task_id": "t1", "source": "s"})
            .as_object()
            .cloned()
            .unwrap();
        let task = Task {
            domain: "maze".into(),
            task_id: "t1".into(),
            first_frame: frame(),
            goal: Goal::Text("  left  ".into()),
            prompt: "Go".into(),
            metadata: Some(meta),
        };

        let dir = TaskWriter::new(out.path()).write(&task).unwrap();
        assert_eq!(dir, out.path().join("maze_task").join("t1"));
        assert!(Schema::Lenient.validate_dir(&dir));
        assert!(!dir.join(FINAL_FRAME_FILE).exists());
        assert_eq!(std::fs::read_to_string(dir.join(GOAL_FILE)).unwrap(), "left");
        assert_eq!(std::fs::read_to_string(dir.join(PROMPT_FILE)).unwrap(), "Go");

        let written = std::fs::read_to_string(dir.join(METADATA_FILE)).unwrap();
        assert!(written.starts_with("{\n  \"domain\": \"maze\""));
    }

    #[test]
    fn frame_goal_without_metadata_is_strict_layout() {
        let out = tempfile::tempdir().unwrap();
        let task = Task {
            domain: "puzzle".into(),
            task_id: "t2".into(),
            first_frame: frame(),
            goal: Goal::Frame(frame()),
            prompt: "Go".into(),
            metadata: None,
        };

        let dir = TaskWriter::new(out.path()).write(&task).unwrap();
        assert!(Schema::Strict.validate_dir(&dir));
        assert!(!dir.join(METADATA_FILE).exists());
        let decoded = image::open(dir.join(FIRST_FRAME_FILE)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 3));
    }
}
