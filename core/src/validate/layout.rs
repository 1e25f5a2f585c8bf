//! Fixed file names of a task directory:
//!
//! ```text
//! {output_root}/{domain}_task/{task_id}/
//!   first_frame.png
//!   final_frame.png          (image goal)
//!   goal.txt                 (text goal, lenient only)
//!   prompt.txt
//!   question_metadata.json   (lenient only)
//! ```

pub const FIRST_FRAME_FILE: &str = "first_frame.png";
pub const FINAL_FRAME_FILE: &str = "final_frame.png";
pub const GOAL_FILE: &str = "goal.txt";
pub const PROMPT_FILE: &str = "prompt.txt";
pub const METADATA_FILE: &str = "question_metadata.json";

pub const TASK_DIR_SUFFIX: &str = "_task";

pub const REQUIRED_METADATA_KEYS: [&str; 3] = ["domain", "task_id", "source"];
