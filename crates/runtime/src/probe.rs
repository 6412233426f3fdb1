//! CDP readiness probing.
//!
//! The browser exposes no push signal for "debugger is up"; the only
//! observable is whether an HTTP GET against `/json/version` succeeds right
//! now, so readiness is detected by bounded polling. Per-probe timeouts stay
//! short so a hung process cannot stall a caller for the full budget, while
//! the overall deadline absorbs legitimately slow startups (disk I/O, profile
//! initialization).

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, trace};

/// Per-attempt probe timeout used by [`wait_until_ready`].
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
/// Delay between probe attempts.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(200);

/// `/json/version` response subset from the Chrome DevTools Protocol.
#[derive(Debug, Deserialize)]
struct CdpVersionInfo {
	#[serde(rename = "webSocketDebuggerUrl")]
	web_socket_debugger_url: String,
}

/// Performs a single readiness probe against `<cdp_url>/json/version`.
///
/// Returns true only for a success status with a JSON body advertising a
/// non-empty debugger URL. Connection failures, non-success statuses,
/// malformed bodies, and timeout expiry all yield false; this never errors.
pub async fn is_cdp_ready(cdp_url: &str, timeout: Duration) -> bool {
	let Ok(client) = reqwest::Client::builder().timeout(timeout).build() else {
		return false;
	};

	let url = format!("{}/json/version", cdp_url);
	let response = match client.get(&url).send().await {
		Ok(response) => response,
		Err(err) => {
			trace!(%url, error = %err, "CDP probe failed");
			return false;
		}
	};

	if !response.status().is_success() {
		trace!(%url, status = %response.status(), "CDP probe returned non-success status");
		return false;
	}

	match response.json::<CdpVersionInfo>().await {
		Ok(info) => !info.web_socket_debugger_url.is_empty(),
		Err(err) => {
			trace!(%url, error = %err, "CDP probe body was not a version payload");
			false
		}
	}
}

/// Polls [`is_cdp_ready`] until a probe succeeds or `overall_deadline`
/// elapses. Returns whether the endpoint became ready in time.
pub async fn wait_until_ready(cdp_url: &str, overall_deadline: Duration) -> bool {
	let deadline = tokio::time::Instant::now() + overall_deadline;

	loop {
		if is_cdp_ready(cdp_url, PROBE_TIMEOUT).await {
			debug!(%cdp_url, "CDP endpoint is ready");
			return true;
		}
		if tokio::time::Instant::now() >= deadline {
			debug!(%cdp_url, ?overall_deadline, "CDP endpoint never became ready");
			return false;
		}
		tokio::time::sleep(PROBE_INTERVAL).await;
	}
}
