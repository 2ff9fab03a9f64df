use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirdelta")]
#[command(about = "Compares two directory trees and reports size differences")]
#[command(version)]
pub struct Cli {
    /// Baseline directory for the comparison
    pub old_dir: PathBuf,

    /// Directory to compare against the baseline
    pub new_dir: PathBuf,

    /// Output as JSON instead of plain text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show timing, memory, and skipped-entry details
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,

    /// Suppress the progress status line
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}
