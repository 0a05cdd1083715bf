//! Logging setup

use tracing::Level;
use tracing_subscriber::{fmt::time::UtcTime, FmtSubscriber};

/// Installs the global subscriber.
///
/// Logs go to stderr; stdout carries the diagnostics.
pub fn setup_logging(level: Level) -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

