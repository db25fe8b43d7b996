//! Diagnostic output for the `facetview` binary.
//!
//! Logs go to stderr so they never mix with command output on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `FACETVIEW_LOG=facetview_engine=debug`.
pub const LOG_ENV: &str = "FACETVIEW_LOG";

/// Default directive for a given `-v` count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	}
}

/// Install the global subscriber. Calling this twice is harmless; the second
/// install is ignored.
pub fn initialize(verbosity: u8) {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}
