use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vistask_core::config::LoggingConfig;
use vistask_core::convert::SKIPPED_RECORDS_TARGET;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Filter for one tool run: `rust_log` (the `RUST_LOG` value) when non-blank,
/// else the configured level. Skip warnings are muted when
/// `skipped_records` is off, whatever the base filter says.
pub fn env_filter(logging: &LoggingConfig, rust_log: Option<&str>) -> Result<EnvFilter, String> {
    let base = rust_log
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(logging.level.as_str());
    let mut filter = EnvFilter::try_new(base).map_err(|e| format!("bad log filter '{base}': {e}"))?;
    if !logging.skipped_records {
        let mute: Directive = format!("{SKIPPED_RECORDS_TARGET}=off")
            .parse()
            .map_err(|e| format!("bad log directive: {e}"))?;
        filter = filter.add_directive(mute);
    }
    Ok(filter)
}

/// `vistask-convert.1234.log` style: one file per tool invocation.
pub fn log_file_name(tool: &str) -> String {
    format!("{tool}.{}.log", std::process::id())
}

fn file_writer(tool: &str, logging: &LoggingConfig) -> Result<Option<NonBlocking>, String> {
    if !logging.file {
        return Ok(None);
    }
    let dir = logging.log_directory();
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("cannot create log directory {}: {e}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, log_file_name(tool));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(Some(writer))
}

/// Install the global subscriber for `tool`. Progress and summaries are
/// printed by the commands themselves; this only carries diagnostics.
pub fn init_tracing(tool: &str, logging: &LoggingConfig) -> Result<(), String> {
    if logging.is_silent() {
        return Ok(());
    }

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = env_filter(logging, rust_log.as_deref())?;

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_target(false)
    });
    let file_layer = file_writer(tool, logging)?.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
