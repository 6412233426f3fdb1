//! Error types for the browser runtime.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while launching or managing a browser.
#[derive(Debug, Error)]
pub enum Error {
	/// No Chromium-family browser was found in any known install location.
	#[error("no supported browser found (Chrome/Brave/Edge/Chromium)")]
	ExecutableNotFound,

	/// The OS refused to start the browser process.
	#[error("failed to launch browser: {0}")]
	Spawn(String),

	/// The browser started but its debugging endpoint never became reachable.
	/// The orphaned process has already been force-killed by the time this
	/// error is returned.
	#[error("CDP endpoint on port {port} not ready after {timeout:?}")]
	ReadinessTimeout { port: u16, timeout: Duration },

	/// I/O error (profile directory creation).
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
