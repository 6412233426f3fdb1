//! One-shot CDP readiness check.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use cdp_runtime::is_cdp_ready;

use crate::cli::ProbeArgs;

pub async fn run(args: ProbeArgs) -> Result<()> {
	let cdp_url = format!("http://127.0.0.1:{}", args.port);
	let ready = is_cdp_ready(&cdp_url, Duration::from_millis(args.timeout_ms)).await;

	let payload = json!({
		"cdpUrl": cdp_url,
		"ready": ready,
	});
	println!("{}", serde_json::to_string_pretty(&payload)?);

	if !ready {
		std::process::exit(1);
	}
	Ok(())
}
