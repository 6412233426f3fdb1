use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Root CLI for cdpctl.
#[derive(Parser, Debug)]
#[command(name = "cdpctl")]
#[command(about = "Launch and manage a browser with CDP remote debugging")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Locate the first installed Chromium-family browser.
	Find,
	/// Check whether a CDP endpoint is currently responding.
	Probe(ProbeArgs),
	/// Launch a browser, print its endpoint, and hold it until Ctrl-C.
	Launch(LaunchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
	/// Remote debugging port to probe.
	#[arg(long, default_value_t = 9222)]
	pub port: u16,

	/// Probe timeout in milliseconds.
	#[arg(long, value_name = "MS", default_value_t = 500)]
	pub timeout_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
	/// Remote debugging port.
	#[arg(long, default_value_t = 9222)]
	pub port: u16,

	/// Run without a visible window.
	#[arg(long)]
	pub headless: bool,

	/// Disable OS sandboxing (needed when running as root).
	#[arg(long)]
	pub no_sandbox: bool,

	/// Profile directory; a scratch directory is created when omitted.
	#[arg(long, value_name = "DIR")]
	pub user_data_dir: Option<PathBuf>,

	/// Readiness deadline in seconds.
	#[arg(long, value_name = "SECS", default_value_t = 15)]
	pub ready_timeout: u64,
}
