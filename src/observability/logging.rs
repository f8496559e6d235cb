use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging plus a daily-rolling JSON log file in `log_dir`.
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// for the life of the process.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    // Determine filter: respect RUST_LOG if set; otherwise default to info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("donor_lookup=info,warn"));

    if fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
        tracing::warn!("Could not create log directory {}, logging to console only", log_dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "donor_lookup.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    Some(guard)
}
