use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dbtoy::config::{Config, LOG_ENV};
use dbtoy::{Repl, Table};

// Logs go to stderr so stdout carries only the protocol.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = match &config.log_level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let mut table = Table::new(config.max_pages);
    let mut repl = Repl::new(config.prompt());

    repl.run(io::stdin().lock(), io::stdout().lock(), &mut table)
        .context("session aborted")?;
    Ok(())
}
