//! Browser launch and shutdown orchestration.
//!
//! A launch resolves an executable, spawns it with remote debugging enabled,
//! and only hands the [`BrowserInstance`] to the caller once the CDP endpoint
//! has been confirmed live. Close drives a two-phase shutdown: a graceful
//! termination signal, a bounded wait for the process to die (or for its
//! debug endpoint to stop answering), then a forced kill.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::executable::{BrowserExecutable, find_browser_executable};
use crate::launch_args::build_launch_args;
use crate::probe::{is_cdp_ready, wait_until_ready};

/// Default remote debugging port.
pub const DEFAULT_CDP_PORT: u16 = 9222;
/// Default overall deadline for the CDP endpoint to become ready.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(15);

/// Grace period between the polite termination signal and the forced kill.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(2500);
/// Poll interval while waiting for graceful shutdown.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Liveness probe timeout used during shutdown polling.
const SHUTDOWN_PROBE_TIMEOUT: Duration = Duration::from_millis(200);

/// Options for launching a debuggable browser.
///
/// Callers running several instances concurrently must choose distinct
/// `port`/`user_data_dir` values; the runtime does not coordinate them.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
	/// Run without a visible window (`--headless=new` plus GPU disable).
	pub headless: bool,
	/// TCP port for the remote debugging endpoint.
	pub port: u16,
	/// Profile directory; a scratch directory under the OS temp root is
	/// created when unset.
	pub user_data_dir: Option<PathBuf>,
	/// Disable OS sandboxing, required when running as root.
	pub no_sandbox: bool,
	/// Overall deadline for the debugging endpoint to come up.
	pub ready_timeout: Duration,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			headless: false,
			port: DEFAULT_CDP_PORT,
			user_data_dir: None,
			no_sandbox: false,
			ready_timeout: DEFAULT_READY_TIMEOUT,
		}
	}
}

/// Terminal state of one [`BrowserInstance::close`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownOutcome {
	/// A previous close already ran; nothing to do.
	AlreadyClosed,
	/// The process had exited before any signal was sent.
	AlreadyExited,
	/// Process exit observed within the grace period.
	Exited,
	/// The CDP endpoint stopped responding within the grace period. The
	/// process is assumed dead; this is a heuristic, a browser whose debug
	/// port closed for another reason would be left running.
	EndpointGone,
	/// Grace deadline elapsed with the process still up; a forced kill was
	/// issued.
	ForceKilled,
}

/// Live handle to a launched browser with a confirmed-ready CDP endpoint.
pub struct BrowserInstance {
	/// Base HTTP URL of the debugging endpoint.
	pub cdp_url: String,
	/// OS process id, or -1 when the OS did not report one.
	pub pid: i32,
	child: Mutex<Option<Child>>,
}

impl std::fmt::Debug for BrowserInstance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BrowserInstance")
			.field("cdp_url", &self.cdp_url)
			.field("pid", &self.pid)
			.finish_non_exhaustive()
	}
}

impl BrowserInstance {
	/// Shut down the browser: graceful signal, bounded wait, forced kill.
	///
	/// Idempotent; calling again after the process has exited (or after a
	/// previous close) is a no-op. Signal delivery failures are swallowed,
	/// a process that is already gone counts as a successful shutdown.
	pub async fn close(&self) -> ShutdownOutcome {
		let mut guard = self.child.lock().await;
		let Some(mut child) = guard.take() else {
			return ShutdownOutcome::AlreadyClosed;
		};

		if let Ok(Some(status)) = child.try_wait() {
			debug!(pid = self.pid, %status, "browser already exited; skipping signal");
			return ShutdownOutcome::AlreadyExited;
		}

		send_graceful_signal(&mut child, self.pid);

		let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
		while tokio::time::Instant::now() < deadline {
			if let Ok(Some(status)) = child.try_wait() {
				debug!(pid = self.pid, %status, "browser exited gracefully");
				return ShutdownOutcome::Exited;
			}
			if !is_cdp_ready(&self.cdp_url, SHUTDOWN_PROBE_TIMEOUT).await {
				debug!(pid = self.pid, "CDP endpoint stopped responding; treating as shutdown");
				return ShutdownOutcome::EndpointGone;
			}
			tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
		}

		warn!(pid = self.pid, "grace deadline elapsed; force killing browser");
		let _ = child.kill().await;
		ShutdownOutcome::ForceKilled
	}
}

/// Send the polite termination signal. Failures are swallowed: by the time
/// the signal goes out the process may already be gone, and that is a
/// success condition.
#[cfg(unix)]
fn send_graceful_signal(child: &mut Child, pid: i32) {
	let target = child.id().map(|id| id as i32).unwrap_or(pid);
	if target > 0 {
		debug!(pid = target, "sending SIGTERM");
		let _ = unsafe { libc::kill(target, libc::SIGTERM) };
	}
}

/// Windows has no polite signal for GUI-less termination; start_kill is the
/// closest equivalent and the grace loop still reaps the exit.
#[cfg(not(unix))]
fn send_graceful_signal(child: &mut Child, pid: i32) {
	debug!(pid, "terminating browser process");
	let _ = child.start_kill();
}

/// Launch the first discoverable browser with remote debugging enabled.
///
/// Fails with [`Error::ExecutableNotFound`] when no supported browser is
/// installed, [`Error::Spawn`] when the OS refuses to start the process, and
/// [`Error::ReadinessTimeout`] when the endpoint never comes up (the
/// half-started process is force-killed first).
pub async fn launch_browser(options: LaunchOptions) -> Result<BrowserInstance> {
	let executable = find_browser_executable().ok_or(Error::ExecutableNotFound)?;
	launch_browser_at(&executable, options).await
}

/// Launch a specific browser executable with remote debugging enabled.
///
/// Same contract as [`launch_browser`] minus the discovery step; useful when
/// the caller already knows which binary to run.
pub async fn launch_browser_at(
	executable: &BrowserExecutable,
	options: LaunchOptions,
) -> Result<BrowserInstance> {
	let cdp_url = format!("http://127.0.0.1:{}", options.port);

	let user_data_dir = match &options.user_data_dir {
		Some(dir) => dir.clone(),
		None => scratch_profile_dir(),
	};
	std::fs::create_dir_all(&user_data_dir)?;

	let args = build_launch_args(options.port, &user_data_dir, options.headless, options.no_sandbox);

	info!(
		kind = %executable.kind,
		path = %executable.path.display(),
		port = options.port,
		headless = options.headless,
		"launching browser"
	);

	let mut cmd = Command::new(&executable.path);
	cmd.args(&args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null());

	// Some browsers refuse to start without a home directory in the
	// environment.
	if let Some(home) = dirs::home_dir() {
		cmd.env("HOME", &home);
	}

	#[cfg(unix)]
	cmd.process_group(0);

	let mut child = cmd.spawn().map_err(|err| {
		Error::Spawn(format!("{}: {}", executable.path.display(), err))
	})?;
	let pid = child.id().map(|id| id as i32).unwrap_or(-1);

	if !wait_until_ready(&cdp_url, options.ready_timeout).await {
		warn!(pid, port = options.port, "CDP endpoint never came up; killing orphaned process");
		let _ = child.kill().await;
		return Err(Error::ReadinessTimeout {
			port: options.port,
			timeout: options.ready_timeout,
		});
	}

	info!(pid, %cdp_url, "browser ready");
	Ok(BrowserInstance {
		cdp_url,
		pid,
		child: Mutex::new(Some(child)),
	})
}

/// Unique scratch profile directory under the OS temp root.
fn scratch_profile_dir() -> PathBuf {
	let timestamp = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_millis();
	std::env::temp_dir().join(format!("cdp-runtime-{}-{}", std::process::id(), timestamp))
}

#[cfg(test)]
mod tests {
	use std::fs;
	#[cfg(unix)]
	use std::os::unix::fs::PermissionsExt;
	use std::path::Path;

	use tempfile::TempDir;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tokio::net::TcpListener;

	use super::*;
	use crate::executable::BrowserKind;

	#[cfg(unix)]
	fn write_mock_browser(path: &Path, script: &str) {
		fs::write(path, script).unwrap();
		let mut perms = fs::metadata(path).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(path, perms).unwrap();
	}

	#[cfg(unix)]
	fn process_is_gone(pid: i32) -> bool {
		unsafe { libc::kill(pid, 0) != 0 }
	}

	/// Port with nothing listening on it.
	async fn dead_port() -> u16 {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let port = listener.local_addr().unwrap().port();
		drop(listener);
		port
	}

	fn quick_options(port: u16) -> LaunchOptions {
		LaunchOptions {
			port,
			ready_timeout: Duration::from_millis(600),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn spawn_failure_is_distinct_from_readiness_timeout() {
		let temp = TempDir::new().unwrap();
		let exe = BrowserExecutable {
			kind: BrowserKind::Chromium,
			path: temp.path().join("definitely-missing-browser"),
		};

		let err = launch_browser_at(&exe, quick_options(dead_port().await))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::Spawn(_)), "got {err:?}");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn readiness_timeout_kills_the_orphaned_process() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("mock-browser");
		let pid_file = temp.path().join("pid");
		// Records its pid, then idles without ever opening the debug port.
		write_mock_browser(
			&script,
			&format!("#!/bin/sh\necho $$ > {}\nexec sleep 30\n", pid_file.display()),
		);

		let exe = BrowserExecutable { kind: BrowserKind::Chrome, path: script };
		let err = launch_browser_at(&exe, quick_options(dead_port().await))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::ReadinessTimeout { .. }), "got {err:?}");

		let pid: i32 = fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
		assert!(process_is_gone(pid), "mock browser {pid} leaked after timeout");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn close_signals_gracefully_and_is_idempotent() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("mock-browser");
		let marker = temp.path().join("term-received");
		// Exits on SIGTERM, touching a marker so the test can observe the
		// graceful path. Background sleep keeps the trap responsive.
		write_mock_browser(
			&script,
			&format!(
				"#!/bin/sh\ntrap 'touch {}; exit 0' TERM\nsleep 30 &\nwait $!\n",
				marker.display()
			),
		);

		let mut cmd = Command::new(&script);
		cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
		let child = cmd.spawn().unwrap();
		let pid = child.id().map(|id| id as i32).unwrap_or(-1);

		let instance = BrowserInstance {
			cdp_url: format!("http://127.0.0.1:{}", dead_port().await),
			pid,
			child: Mutex::new(Some(child)),
		};

		let outcome = instance.close().await;
		assert!(
			matches!(outcome, ShutdownOutcome::Exited | ShutdownOutcome::EndpointGone),
			"got {outcome:?}"
		);

		// The trap ran, so the shutdown was the polite one.
		for _ in 0..20 {
			if marker.exists() {
				break;
			}
			tokio::time::sleep(Duration::from_millis(100)).await;
		}
		assert!(marker.exists(), "mock browser never saw SIGTERM");

		assert_eq!(instance.close().await, ShutdownOutcome::AlreadyClosed);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn close_after_external_exit_is_a_noop() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("mock-browser");
		write_mock_browser(&script, "#!/bin/sh\nexit 0\n");

		let mut cmd = Command::new(&script);
		cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
		let child = cmd.spawn().unwrap();
		let pid = child.id().map(|id| id as i32).unwrap_or(-1);

		// Let the process finish before closing.
		tokio::time::sleep(Duration::from_millis(300)).await;

		let instance = BrowserInstance {
			cdp_url: format!("http://127.0.0.1:{}", dead_port().await),
			pid,
			child: Mutex::new(Some(child)),
		};

		let start = std::time::Instant::now();
		assert_eq!(instance.close().await, ShutdownOutcome::AlreadyExited);
		assert!(start.elapsed() < Duration::from_secs(1), "no-op close should return promptly");
		assert_eq!(instance.close().await, ShutdownOutcome::AlreadyClosed);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn close_escalates_to_force_kill_when_process_ignores_sigterm() {
		// Keeps a fake /json/version endpoint alive for the whole grace
		// window so neither shutdown signal is observed.
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let port = listener.local_addr().unwrap().port();
		tokio::spawn(async move {
			loop {
				let Ok((mut stream, _)) = listener.accept().await else {
					break;
				};
				tokio::spawn(async move {
					let mut buf = [0u8; 1024];
					let _ = stream.read(&mut buf).await;
					let body = r#"{"webSocketDebuggerUrl":"ws://127.0.0.1/devtools/browser/x"}"#;
					let response = format!(
						"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
						body.len(),
						body
					);
					let _ = stream.write_all(response.as_bytes()).await;
					let _ = stream.shutdown().await;
				});
			}
		});

		let temp = TempDir::new().unwrap();
		let script = temp.path().join("mock-browser");
		// The ready marker keeps close() from signalling before the trap is
		// installed; SIGTERM delivered that early would kill the shell.
		let ready = temp.path().join("trap-installed");
		write_mock_browser(
			&script,
			&format!(
				"#!/bin/sh\ntrap '' TERM\ntouch {}\nwhile true; do sleep 1; done\n",
				ready.display()
			),
		);

		let mut cmd = Command::new(&script);
		cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
		let child = cmd.spawn().unwrap();
		let pid = child.id().map(|id| id as i32).unwrap_or(-1);

		for _ in 0..50 {
			if ready.exists() {
				break;
			}
			tokio::time::sleep(Duration::from_millis(100)).await;
		}
		assert!(ready.exists(), "mock browser never installed its TERM trap");

		let instance = BrowserInstance {
			cdp_url: format!("http://127.0.0.1:{}", port),
			pid,
			child: Mutex::new(Some(child)),
		};

		assert_eq!(instance.close().await, ShutdownOutcome::ForceKilled);
		assert!(process_is_gone(pid), "force-killed process still present");
	}

	#[test]
	fn scratch_profile_dirs_live_under_the_temp_root() {
		let dir = scratch_profile_dir();
		assert!(dir.starts_with(std::env::temp_dir()));
		let name = dir.file_name().unwrap().to_string_lossy().into_owned();
		assert!(name.starts_with("cdp-runtime-"), "got {name}");
	}

	#[test]
	fn default_options_match_documented_defaults() {
		let options = LaunchOptions::default();
		assert!(!options.headless);
		assert!(!options.no_sandbox);
		assert_eq!(options.port, DEFAULT_CDP_PORT);
		assert!(options.user_data_dir.is_none());
		assert_eq!(options.ready_timeout, DEFAULT_READY_TIMEOUT);
	}
}
