use clap::Parser;
use dirdelta::cli::Cli;
use dirdelta::config::Config;
use dirdelta::report;
use dirdelta::runner::{CompareRunner, RunEvent};

fn main() {
    let cli = Cli::parse();
    let config = Config::from_args(&cli);

    let runner = CompareRunner::new();
    let handle = match runner.start(config.old_root.clone(), config.new_root.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    while let Some(event) = handle.recv() {
        match event {
            RunEvent::Status(message) => {
                if !config.quiet {
                    eprintln!("{message}");
                }
            }
            RunEvent::Done(report) => {
                report::print(&report, &config);
            }
            RunEvent::Failed(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
            RunEvent::Cancelled => {
                eprintln!("comparison cancelled");
                std::process::exit(1);
            }
        }
    }
}
