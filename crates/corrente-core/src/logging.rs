//! Tracing setup.
//!
//! Logs go to a daily rolling file under `$CORRENTE_HOME/logs` so they never
//! interleave with command output. The filter comes from `CORRENTE_LOG`
//! (same syntax as `RUST_LOG`) and defaults to `warn`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "CORRENTE_LOG";

const LOG_FILE_PREFIX: &str = "corrente.log";

/// Installs the global subscriber.
///
/// Returns the appender guard, which must stay alive until exit so buffered
/// lines are flushed. Returns `None` when the log directory cannot be created
/// or a subscriber is already installed; logging is then silently disabled.
pub fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let logs_dir = paths::logs_dir();
    std::fs::create_dir_all(&logs_dir).ok()?;

    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
