//! cli::logging
//!
//! Installs the `tracing` subscriber for the binary.
//!
//! Logs go to stderr; stdout carries only command output. The filter is
//! taken from `--debug`, then `$GITVERSION_LOG`, then the config `log`
//! directive, then defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "GITVERSION_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Later calls are no-ops.
pub fn init(debug: bool, config_directive: Option<&str>) {
    let env_directive = std::env::var(LOG_ENV).ok();
    let filter = build_filter(debug, env_directive.as_deref(), config_directive);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pick the first usable directive in precedence order.
///
/// An unparsable environment directive falls through to the next source.
pub fn build_filter(
    debug: bool,
    env_directive: Option<&str>,
    config_directive: Option<&str>,
) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }

    [env_directive, config_directive]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .find_map(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
