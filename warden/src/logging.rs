//! Tracing subscriber setup for the server binary.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};


#[derive(Debug, Error)]
pub enum TracingInitializationError {
    #[error("a global tracing subscriber has already been set")]
    AlreadyInitialized {
        #[from]
        #[source]
        error: TryInitError,
    },
}


/// Installs the global tracing subscriber.
///
/// Events are written both to the console and to a daily-rolling log file
/// in `log_file_output_directory` (named `{log_file_name_prefix}.YYYY-MM-DD`),
/// each output filtered separately.
///
/// The returned guard flushes the log file when dropped, so it must be held
/// until the program exits.
pub fn initialize_tracing<P>(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: P,
    log_file_name_prefix: &str,
) -> Result<WorkerGuard, TracingInitializationError>
where
    P: AsRef<Path>,
{
    let rolling_file_appender =
        tracing_appender::rolling::daily(log_file_output_directory, log_file_name_prefix);
    let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(rolling_file_appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(console_level_filter);

    let log_file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(non_blocking_file_writer)
        .with_filter(log_file_level_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_file_layer)
        .try_init()?;

    Ok(guard)
}
