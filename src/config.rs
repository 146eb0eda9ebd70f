//! Command-line configuration.

use clap::Parser;

use crate::TABLE_MAX_PAGES;

pub const DEFAULT_PROMPT: &str = "db > ";

/// Environment variable read for log filter directives when `--log-level`
/// is not given.
pub const LOG_ENV: &str = "DBTOY_LOG";

const MAX_PAGES_LIMIT: usize = 100_000;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dbtoy",
    version,
    about = "A single-table row store driven line by line over stdin"
)]
pub struct Config {
    #[arg(
        long,
        value_name = "N",
        default_value_t = TABLE_MAX_PAGES,
        value_parser = parse_max_pages,
        help = "Maximum number of pages the table may allocate"
    )]
    pub max_pages: usize,

    #[arg(
        long,
        value_name = "TEXT",
        default_value = DEFAULT_PROMPT,
        conflicts_with = "no_prompt",
        help = "Prompt written before each line is read"
    )]
    pub prompt: String,

    #[arg(long, help = "Do not write a prompt")]
    pub no_prompt: bool,

    #[arg(
        long,
        value_name = "FILTER",
        help = "Log filter directives, e.g. `debug` or `dbtoy::pager=trace` (default: $DBTOY_LOG, then `warn`)"
    )]
    pub log_level: Option<String>,
}

impl Config {
    pub fn prompt(&self) -> &str {
        if self.no_prompt { "" } else { &self.prompt }
    }
}

fn parse_max_pages(value: &str) -> Result<usize, String> {
    let pages: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a page count"))?;
    if !(1..=MAX_PAGES_LIMIT).contains(&pages) {
        return Err(format!("must be between 1 and {MAX_PAGES_LIMIT}"));
    }
    Ok(pages)
}
