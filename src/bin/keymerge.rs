//! keymerge CLI tool
//!
//! Merges columns of pre-sorted delimiter-separated files for the same key
//! in the first column of each file.
//!
//! Usage:
//!   keymerge --outfile merged.tsv.gz a.tsv b.tsv.gz c.tsv.xz
//!   keymerge --stdout -v a.tsv b.tsv

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use keymerge::{run, Cli};

fn main() -> Result<()> {
    // Optional .env with KEYMERGE_* defaults, loaded before clap parses
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) if e.is_config() => {
            eprintln!("{}\n", e);
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let destination = config.destination.to_string();
    run(&config).with_context(|| format!("couldn't merge files into {}", destination))?;

    Ok(())
}
