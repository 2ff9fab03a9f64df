//! Plain-text rendering of a comparison report.
//!
//! Keeps the report's line order, indents missing/added paths beneath their
//! section headers, and leaves a blank line after the size summary. Styling
//! beyond that is up to whoever consumes the line kinds.

use crate::diff::{ComparisonReport, LineKind};

pub fn render(report: &ComparisonReport) -> String {
    let mut output = String::new();

    for (i, line) in report.lines.iter().enumerate() {
        match line.kind {
            LineKind::Missing | LineKind::Added => {
                output.push_str("  ");
                output.push_str(&line.text);
            }
            _ => output.push_str(&line.text),
        }
        output.push('\n');

        // the first three lines are always the size summary
        if i == 2 && report.lines.len() > 3 {
            output.push('\n');
        }
    }

    output
}
