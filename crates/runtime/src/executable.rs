//! Browser executable discovery.
//!
//! Consults a fixed, ordered candidate list per OS family and returns the
//! first binary that exists on disk. List order encodes the preference
//! Chrome > Brave > Edge > Chromium, with user-level installs ahead of
//! system-wide ones on Windows. Existence is checked fresh on every call.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

/// Which browser family a discovered binary belongs to. Informational only;
/// all supported browsers speak the same launch flags and CDP surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
	Chrome,
	Chromium,
	Edge,
	Brave,
}

impl fmt::Display for BrowserKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BrowserKind::Chrome => write!(f, "chrome"),
			BrowserKind::Chromium => write!(f, "chromium"),
			BrowserKind::Edge => write!(f, "edge"),
			BrowserKind::Brave => write!(f, "brave"),
		}
	}
}

/// One candidate install location: a browser family and its absolute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserExecutable {
	pub kind: BrowserKind,
	pub path: PathBuf,
}

impl BrowserExecutable {
	fn new(kind: BrowserKind, path: impl Into<PathBuf>) -> Self {
		Self { kind, path: path.into() }
	}
}

/// Find the first installed Chromium-family browser on this host.
///
/// Returns `None` when no candidate exists or the host OS is unsupported;
/// absence is not an error at this layer.
pub fn find_browser_executable() -> Option<BrowserExecutable> {
	let candidates = if cfg!(target_os = "macos") {
		macos_candidates()
	} else if cfg!(target_os = "linux") {
		linux_candidates()
	} else if cfg!(target_os = "windows") {
		windows_candidates()
	} else {
		return None;
	};

	first_existing(&candidates)
}

/// Returns the first candidate whose path exists, in list order.
fn first_existing(candidates: &[BrowserExecutable]) -> Option<BrowserExecutable> {
	for candidate in candidates {
		if candidate.path.exists() {
			debug!(
				kind = %candidate.kind,
				path = %candidate.path.display(),
				"found browser executable"
			);
			return Some(candidate.clone());
		}
	}
	None
}

fn macos_candidates() -> Vec<BrowserExecutable> {
	use BrowserKind::*;

	// Falls back to the filesystem root when no home directory is resolvable,
	// which makes the user-level candidates harmless no-ops.
	let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
	vec![
		BrowserExecutable::new(Chrome, "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
		BrowserExecutable::new(Chrome, home.join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome")),
		BrowserExecutable::new(Brave, "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser"),
		BrowserExecutable::new(Brave, home.join("Applications/Brave Browser.app/Contents/MacOS/Brave Browser")),
		BrowserExecutable::new(Edge, "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"),
		BrowserExecutable::new(Edge, home.join("Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge")),
		BrowserExecutable::new(Chromium, "/Applications/Chromium.app/Contents/MacOS/Chromium"),
		BrowserExecutable::new(Chromium, home.join("Applications/Chromium.app/Contents/MacOS/Chromium")),
	]
}

fn linux_candidates() -> Vec<BrowserExecutable> {
	use BrowserKind::*;

	vec![
		BrowserExecutable::new(Chrome, "/usr/bin/google-chrome"),
		BrowserExecutable::new(Chrome, "/usr/bin/google-chrome-stable"),
		BrowserExecutable::new(Chrome, "/usr/bin/chrome"),
		BrowserExecutable::new(Brave, "/usr/bin/brave-browser"),
		BrowserExecutable::new(Brave, "/usr/bin/brave-browser-stable"),
		BrowserExecutable::new(Brave, "/usr/bin/brave"),
		BrowserExecutable::new(Brave, "/snap/bin/brave"),
		BrowserExecutable::new(Edge, "/usr/bin/microsoft-edge"),
		BrowserExecutable::new(Edge, "/usr/bin/microsoft-edge-stable"),
		BrowserExecutable::new(Chromium, "/usr/bin/chromium"),
		BrowserExecutable::new(Chromium, "/usr/bin/chromium-browser"),
		BrowserExecutable::new(Chromium, "/snap/bin/chromium"),
	]
}

fn windows_candidates() -> Vec<BrowserExecutable> {
	use BrowserKind::*;

	let program_files =
		std::env::var("ProgramFiles").map_or_else(|_| PathBuf::from(r"C:\Program Files"), PathBuf::from);
	let program_files_x86 = std::env::var("ProgramFiles(x86)")
		.map_or_else(|_| PathBuf::from(r"C:\Program Files (x86)"), PathBuf::from);

	let mut candidates = Vec::new();

	// User-level installs come first. Without LOCALAPPDATA there is no
	// per-user install root, so only the system-wide roots are probed.
	if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
		let local = PathBuf::from(local_app_data);
		candidates.extend([
			BrowserExecutable::new(Chrome, local.join(r"Google\Chrome\Application\chrome.exe")),
			BrowserExecutable::new(Brave, local.join(r"BraveSoftware\Brave-Browser\Application\brave.exe")),
			BrowserExecutable::new(Edge, local.join(r"Microsoft\Edge\Application\msedge.exe")),
			BrowserExecutable::new(Chromium, local.join(r"Chromium\Application\chrome.exe")),
		]);
	}

	candidates.extend([
		BrowserExecutable::new(Chrome, program_files.join(r"Google\Chrome\Application\chrome.exe")),
		BrowserExecutable::new(Chrome, program_files_x86.join(r"Google\Chrome\Application\chrome.exe")),
		BrowserExecutable::new(Brave, program_files.join(r"BraveSoftware\Brave-Browser\Application\brave.exe")),
		BrowserExecutable::new(Brave, program_files_x86.join(r"BraveSoftware\Brave-Browser\Application\brave.exe")),
		BrowserExecutable::new(Edge, program_files.join(r"Microsoft\Edge\Application\msedge.exe")),
		BrowserExecutable::new(Edge, program_files_x86.join(r"Microsoft\Edge\Application\msedge.exe")),
	]);

	candidates
}
