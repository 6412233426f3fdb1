//! Launch a debuggable browser and hold it open until interrupted.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use cdp_runtime::{LaunchOptions, launch_browser};

use crate::cli::LaunchArgs;

pub async fn run(args: LaunchArgs) -> Result<()> {
	let options = LaunchOptions {
		headless: args.headless,
		port: args.port,
		user_data_dir: args.user_data_dir,
		no_sandbox: args.no_sandbox,
		ready_timeout: Duration::from_secs(args.ready_timeout),
	};

	let instance = launch_browser(options).await.context("browser launch failed")?;

	let payload = json!({
		"cdpUrl": instance.cdp_url,
		"pid": instance.pid,
	});
	println!("{}", serde_json::to_string_pretty(&payload)?);

	info!(pid = instance.pid, "browser running; press Ctrl-C to shut it down");
	tokio::signal::ctrl_c().await.context("failed to wait for Ctrl-C")?;

	let outcome = instance.close().await;
	info!(?outcome, "browser shut down");
	Ok(())
}
