//! # Observability
//!
//! Logging setup shared by the campus client crates.
//!
//! Library crates only emit `tracing` events. Binaries call
//! [`init_with_config`] once at startup to decide where those events go:
//!
//! - a compact human-readable stream on stderr, and/or
//! - structured JSONL appended to a log file, one object per line.
//!
//! `RUST_LOG` always takes precedence over the configured default level.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "cli".into(),
//!     default_level: "warn".into(),
//!     log_path: Some("/home/me/.campus/logs/client.jsonl".into()),
//!     ..Default::default()
//! })?;
//! tracing::info!("ready");
//! ```

mod file;
mod json_layer;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file::LogFileWriter;
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the emitting program (e.g. "cli").
    /// Included in every JSONL line.
    pub service_name: String,

    /// Default level filter (e.g. "debug", "info", "warn").
    /// Overridden by `RUST_LOG`.
    pub default_level: String,

    /// JSONL log file. `None` disables file output.
    pub log_path: Option<PathBuf>,

    /// Emit compact logs on stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "campus".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging with a custom configuration.
///
/// Returns an error only if the log file cannot be opened. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let json_layer = match &config.log_path {
        Some(path) => {
            let writer = LogFileWriter::new(path)?;
            Some(
                JsonLayer::new(config.service_name.clone(), writer)
                    .with_filter(env_filter(&config.default_level)),
            )
        }
        None => None,
    };

    let stderr_layer = if config.also_stderr {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(io::stderr)
                .with_filter(env_filter(&config.default_level)),
        )
    } else {
        None
    };

    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            service = %config.service_name,
            log_path = ?config.log_path,
            "observability initialized"
        );
    }

    Ok(())
}
