use std::path::{Path, PathBuf};

use vistask_core::config::AppConfig;
use vistask_core::error::{CliError, ConfigError};
use vistask_core::validate::layout::TASK_DIR_SUFFIX;
use vistask_core::validate::describe;
use vistask_core::Schema;

use super::cli::CheckArgs;

/// Every `{root}/*_task/*` directory, sorted.
pub fn task_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let domain_dir = entry?.path();
        let is_task_group = domain_dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TASK_DIR_SUFFIX));
        if !is_task_group || !domain_dir.is_dir() {
            continue;
        }
        for task in std::fs::read_dir(&domain_dir)? {
            let task = task?.path();
            if task.is_dir() {
                out.push(task);
            }
        }
    }
    out.sort();
    Ok(out)
}

pub fn run(args: CheckArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.convert.output));
    if !root.is_dir() {
        return Err(ConfigError::MissingInput(root.display().to_string()).into());
    }
    let schema: Schema = match args.schema {
        Some(s) => s.into(),
        None => cfg.convert.schema.parse()?,
    };

    let dirs = task_dirs(&root)?;
    let mut invalid = 0;
    for dir in &dirs {
        let violations = schema.check_dir(dir);
        if !violations.is_empty() {
            invalid += 1;
            println!("✗ {}: {}", dir.display(), describe(&violations));
        }
    }
    tracing::info!(total = dirs.len(), invalid, %schema, "checked task directories");

    println!(
        "\n{} valid, {} invalid ({schema} schema)",
        dirs.len() - invalid,
        invalid
    );
    Ok(if invalid == 0 { 0 } else { 1 })
}
