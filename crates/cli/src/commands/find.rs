//! Report the first discoverable browser executable.

use anyhow::{Result, bail};
use serde_json::json;

use cdp_runtime::find_browser_executable;

pub fn run() -> Result<()> {
	match find_browser_executable() {
		Some(exe) => {
			let payload = json!({
				"kind": exe.kind,
				"path": exe.path,
			});
			println!("{}", serde_json::to_string_pretty(&payload)?);
			Ok(())
		}
		None => bail!("no supported browser found (Chrome/Brave/Edge/Chromium)"),
	}
}
