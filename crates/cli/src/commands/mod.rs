//! Command dispatch for cdpctl.

mod find;
mod launch;
mod probe;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Find => find::run(),
		Commands::Probe(args) => probe::run(args).await,
		Commands::Launch(args) => launch::run(args).await,
	}
}
