//! This module handles logging with `tracing`, to `stdout` and to rolling log files.

use std::path::Path;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};
use tracing_unwrap::ResultExt;

/// The common prefix for the log files.
const LOG_PREFIX: &str = "holiday-wishes.log";

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        /// The default level for `stdout` when `RUST_LOG` isn't set.
        const STDOUT_LEVEL: LevelFilter = LevelFilter::DEBUG;
    } else {
        /// The default level for `stdout` when `RUST_LOG` isn't set.
        const STDOUT_LEVEL: LevelFilter = LevelFilter::INFO;
    }
}

/// Initialise a subscriber for tracing to log to `stdout` and to a daily log file in the given
/// directory.
///
/// The returned guard must be kept alive for the file logs to be written.
pub fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let (appender, guard) = non_blocking(rolling::daily(log_dir, LOG_PREFIX));

    let subscriber = tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::DEBUG.into())
                        .parse_lossy("wgpu=warn,naga=warn"),
                ),
        )
        .with(
            Layer::new()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(STDOUT_LEVEL.into())
                        .from_env_lossy(),
                ),
        );

    tracing::subscriber::set_global_default(subscriber)
        .expect_or_log("Setting the global default for tracing should be okay");

    guard
}
