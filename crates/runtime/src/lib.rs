//! Browser process lifecycle management for the Chrome DevTools Protocol.
//!
//! Locates a debuggable Chromium-family browser on the host, launches it with
//! remote debugging enabled, waits for the CDP endpoint to come up, and tears
//! the process down deterministically (graceful signal, then forced kill).
//! Everything above the readiness probe (actual CDP commands, sessions,
//! targets) is a separate client's concern; this crate only produces a live
//! [`BrowserInstance`] handle.
//!
//! Concurrent launches are not coordinated: callers running more than one
//! instance must pick distinct ports and user-data directories themselves.

pub mod error;
pub mod executable;
pub mod instance;
pub mod launch_args;
pub mod probe;

pub use error::{Error, Result};
pub use executable::{BrowserExecutable, BrowserKind, find_browser_executable};
pub use instance::{
	BrowserInstance, DEFAULT_CDP_PORT, DEFAULT_READY_TIMEOUT, LaunchOptions, ShutdownOutcome,
	launch_browser, launch_browser_at,
};
pub use probe::{is_cdp_ready, wait_until_ready};
