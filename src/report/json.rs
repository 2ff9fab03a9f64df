//! JSON output for comparison reports.
//!
//! Serializes the full report, line kinds included, for scripting and piping.

use crate::diff::ComparisonReport;

pub fn render(report: &ComparisonReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| String::from("{}"))
}
