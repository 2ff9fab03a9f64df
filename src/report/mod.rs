pub mod json;
pub mod table;

use crate::config::Config;
use crate::diff::ComparisonReport;
use crate::util::format_size;

pub fn print(report: &ComparisonReport, config: &Config) {
    if config.json_output {
        println!("{}", json::render(report));
    } else {
        print!("{}", table::render(report));
        print_run_info(report, config.verbose);
        print_diagnostics(report, config.verbose);
    }
}

fn print_run_info(report: &ComparisonReport, verbose: bool) {
    if !verbose {
        return;
    }

    if let Some(duration_ms) = report.duration_ms {
        println!("\ncompared in {:.2}s", duration_ms as f64 / 1000.0);
    }

    if let Some(timestamp) = report.timestamp {
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("compared at: {datetime}");
    }

    if let Some(peak_bytes) = report.peak_memory_bytes {
        println!("peak memory: {}", format_size(peak_bytes as u64));
    }
}

fn print_diagnostics(report: &ComparisonReport, verbose: bool) {
    if report.diagnostics.is_empty() {
        return;
    }

    if verbose {
        eprintln!("\nskipped entries:");
        for diagnostic in &report.diagnostics {
            eprintln!("  {diagnostic}");
        }
    } else {
        eprintln!(
            "\n{} entries skipped (run with --verbose for details)",
            report.diagnostics.len()
        );
    }
}
