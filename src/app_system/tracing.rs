use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::EnvFilter;
use crate::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Output goes to stderr so command output on stdout
/// stays machine-readable.
///
/// ```bash
/// RUST_LOG=debug catalog list
/// RUST_LOG=catalog::catalog_service=debug catalog shell
/// ```
pub fn setup_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(uptime())
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
