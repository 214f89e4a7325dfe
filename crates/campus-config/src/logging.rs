//! Logging initialization for campus client programs.
//!
//! Wraps the `observability` package: structured JSONL goes to
//! `~/.campus/logs/client.jsonl`, and stderr output is opt-in through
//! `CAMPUS_LOG_STDERR` so it does not interleave with command output.

use crate::{CoreResult, Paths};

/// Initialize logging for a client program.
///
/// `level` is the default filter; `RUST_LOG` overrides it.
pub fn init_logging(service_name: &str, level: &str, paths: &Paths) -> CoreResult<()> {
    paths.ensure_dirs()?;

    observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr: stderr_requested(std::env::var("CAMPUS_LOG_STDERR").ok()),
    })?;

    Ok(())
}

fn stderr_requested(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
