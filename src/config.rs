//! Command-line configuration
//!
//! Flags may fall back to `KEYMERGE_*` environment variables (a `.env` file
//! is loaded by the binary before parsing).

use clap::Parser;
use std::path::PathBuf;

use crate::error::{MergeError, Result};
use crate::merge::Delimiter;

#[derive(Parser, Debug)]
#[command(name = "keymerge", version)]
#[command(about = "Merge columns of pre-sorted delimiter-separated files by their first-column key")]
#[command(
    after_help = "Inputs must be sorted by key in byte order (for unix sort, set LC_ALL=C).\n\
                  Files ending in .gz, .bz2, .xz or .zst are (de)compressed automatically."
)]
pub struct Cli {
    /// Input files, merged in the order given
    pub files: Vec<PathBuf>,

    /// Output file
    #[arg(long, short = 'o', env = "KEYMERGE_OUTFILE")]
    pub outfile: Option<PathBuf>,

    /// Write to standard output (takes precedence over --outfile)
    #[arg(long)]
    pub stdout: bool,

    /// Field delimiter: one ASCII character, or \t, tab, comma, space
    #[arg(long, short = 'd', env = "KEYMERGE_DELIMITER", default_value = "\\t")]
    pub delimiter: Delimiter,

    /// Write run statistics as JSON to this file
    #[arg(long, env = "KEYMERGE_STATS")]
    pub stats: Option<PathBuf>,

    /// Be verbose
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A validated run configuration
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub inputs: Vec<PathBuf>,
    pub destination: Destination,
    pub delimiter: Delimiter,
    pub stats_path: Option<PathBuf>,
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<MergeConfig> {
        if self.files.is_empty() {
            return Err(MergeError::Config("no input files given".into()));
        }

        let destination = if self.stdout {
            Destination::Stdout
        } else if let Some(path) = self.outfile {
            Destination::File(path)
        } else {
            return Err(MergeError::Config(
                "no output destination: pass --outfile PATH or --stdout".into(),
            ));
        };

        Ok(MergeConfig {
            inputs: self.files,
            destination,
            delimiter: self.delimiter,
            stats_path: self.stats,
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("keymerge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_outfile_config() {
        let config = parse(&["-o", "out.tsv", "a.tsv", "b.tsv.gz"])
            .into_config()
            .unwrap();
        assert_eq!(config.inputs, vec![PathBuf::from("a.tsv"), PathBuf::from("b.tsv.gz")]);
        assert_eq!(config.destination, Destination::File("out.tsv".into()));
        assert_eq!(config.delimiter, Delimiter::TAB);
        assert!(!config.verbose);
    }

    #[test]
    fn test_stdout_wins_over_outfile() {
        let config = parse(&["--stdout", "--outfile", "out.tsv", "-v", "a.tsv"])
            .into_config()
            .unwrap();
        assert_eq!(config.destination, Destination::Stdout);
        assert!(config.verbose);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = parse(&["--stdout", "-d", "comma", "a.csv"]).into_config().unwrap();
        assert_eq!(config.delimiter.byte(), b',');
        assert!(Cli::try_parse_from(["keymerge", "--stdout", "-d", "ab", "a.csv"]).is_err());
    }

    #[test]
    fn test_missing_inputs_is_config_error() {
        let err = parse(&["--stdout"]).into_config().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_missing_destination_is_config_error() {
        // Only meaningful when the environment doesn't supply an outfile
        if std::env::var_os("KEYMERGE_OUTFILE").is_none() {
            let err = parse(&["a.tsv"]).into_config().unwrap_err();
            assert!(err.is_config());
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
