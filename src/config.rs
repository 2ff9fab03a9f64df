use std::path::PathBuf;

use crate::cli::Cli;

pub struct Config {
    pub old_root: PathBuf,
    pub new_root: PathBuf,
    pub json_output: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl Config {
    pub fn from_args(cli: &Cli) -> Self {
        Config {
            old_root: cli.old_dir.clone(),
            new_root: cli.new_dir.clone(),
            json_output: cli.json,
            verbose: cli.verbose,
            quiet: cli.quiet,
        }
    }
}
