//! Launch argument construction.
//!
//! Produces the exact command-line vector for a debuggable browser launch.
//! The fixed flag set suppresses first-run UX, update checks, crash-restore
//! prompts, and background network activity so launched instances are
//! reproducible and never block on interactive dialogs.

use std::path::Path;

/// Builds the ordered argument vector for a remote-debugging launch.
///
/// `headless` selects the modern headless mode and disables GPU acceleration;
/// the two flags are required together, headless without `--disable-gpu` can
/// fail to start on some platforms. `no_sandbox` disables OS sandboxing for
/// constrained/root environments where sandbox setup itself fails. A trailing
/// `about:blank` guarantees at least one open target, some browsers otherwise
/// idle with nothing the readiness probe can observe.
pub fn build_launch_args(
	port: u16,
	user_data_dir: &Path,
	headless: bool,
	no_sandbox: bool,
) -> Vec<String> {
	let mut args = vec![
		format!("--remote-debugging-port={}", port),
		format!("--user-data-dir={}", user_data_dir.display()),
		"--no-first-run".to_string(),
		"--no-default-browser-check".to_string(),
		"--disable-sync".to_string(),
		"--disable-background-networking".to_string(),
		"--disable-component-update".to_string(),
		"--disable-features=Translate,MediaRouter".to_string(),
		"--disable-session-crashed-bubble".to_string(),
		"--hide-crash-restore-bubble".to_string(),
	];

	if headless {
		args.push("--headless=new".to_string());
		args.push("--disable-gpu".to_string());
	}

	if no_sandbox {
		args.push("--no-sandbox".to_string());
		args.push("--disable-setuid-sandbox".to_string());
	}

	// Default /dev/shm is frequently too small in containers and crashes the
	// renderer.
	if cfg!(target_os = "linux") {
		args.push("--disable-dev-shm-usage".to_string());
	}

	args.push("about:blank".to_string());

	args
}
