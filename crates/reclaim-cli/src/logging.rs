//! Logging setup.

use crate::cli::LogLevel;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow `--log-level`; everything else logs warnings only
const OWN_TARGETS: [&str; 4] = ["kube_reclaim", "reclaim_cli", "reclaim_engine", "reclaim_kube"];

/// Filter directive for a log level
pub fn filter_directive(level: LogLevel) -> String {
    let mut directive = String::from("warn");
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{target}={}", level.as_str()));
    }
    directive
}

/// Install the global subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(level: LogLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
