use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

pub const ARG_DATA_FILE: &str = "data-file";
pub const DEFAULT_DATA_FILE: &str = "data/users.json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_DATA_FILE)
            .long(ARG_DATA_FILE)
            .help("Path of the JSON file holding registered users")
            .env("COACHIQ_DATA_FILE")
            .default_value(DEFAULT_DATA_FILE)
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

#[derive(Debug)]
pub struct Options {
    pub data_file: PathBuf,
}

impl Options {
    /// # Errors
    /// Returns an error if the data file argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let data_file = matches
            .get_one::<PathBuf>(ARG_DATA_FILE)
            .cloned()
            .context("missing required argument: --data-file")?;

        Ok(Self { data_file })
    }
}
