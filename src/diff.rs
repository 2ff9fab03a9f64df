//! Snapshot comparison engine.
//!
//! Compares two directory snapshots and produces an ordered report:
//! - Totals for both trees and the signed size delta
//! - Missing and added files, lexicographically sorted
//! - Per-file size changes for paths present in both trees

use serde::Serialize;

use crate::snapshot::Snapshot;
use crate::util::{format_signed_size, format_size};

/// Semantic tag for a report line, decoupled from visual styling so any
/// renderer can apply its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Header,
    Missing,
    Added,
    Modified,
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub lines: Vec<ReportLine>,
    pub old_total: u64,
    pub new_total: u64,
    pub delta: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_memory_bytes: Option<usize>,
}

fn line(kind: LineKind, text: String) -> ReportLine {
    ReportLine { kind, text }
}

/// Compares two snapshots into a report. Pure and total: empty or identical
/// snapshots are valid inputs and produce a no-differences report.
pub fn compare(old: &Snapshot, new: &Snapshot) -> ComparisonReport {
    // BTreeMap keys iterate sorted, so the diff sets come out in
    // lexicographic order without an extra pass
    let missing: Vec<&String> = old
        .entries
        .keys()
        .filter(|path| !new.entries.contains_key(*path))
        .collect();
    let added: Vec<&String> = new
        .entries
        .keys()
        .filter(|path| !old.entries.contains_key(*path))
        .collect();

    let old_total = i64::try_from(old.total_size).unwrap_or(i64::MAX);
    let new_total = i64::try_from(new.total_size).unwrap_or(i64::MAX);
    let delta = new_total.saturating_sub(old_total);

    let mut lines = vec![
        line(
            LineKind::Header,
            format!("Old directory size: {}", format_size(old.total_size)),
        ),
        line(
            LineKind::Header,
            format!("New directory size: {}", format_size(new.total_size)),
        ),
        line(
            LineKind::Header,
            format!("Size difference: {}", format_signed_size(delta)),
        ),
    ];

    if !missing.is_empty() {
        lines.push(line(LineKind::Header, "Missing files:".to_string()));
        lines.extend(
            missing
                .iter()
                .map(|path| line(LineKind::Missing, (*path).clone())),
        );
    }

    if !added.is_empty() {
        lines.push(line(LineKind::Header, "Added files:".to_string()));
        lines.extend(
            added
                .iter()
                .map(|path| line(LineKind::Added, (*path).clone())),
        );
    }

    let mut modified = 0usize;
    for (path, old_size) in &old.entries {
        let Some(new_size) = new.entries.get(path) else {
            continue;
        };

        if new_size != old_size {
            lines.push(line(
                LineKind::Modified,
                format!(
                    "Modified: {path} ({} -> {})",
                    format_size(*old_size),
                    format_size(*new_size)
                ),
            ));
            modified += 1;
        }
    }

    if missing.is_empty() && added.is_empty() && modified == 0 {
        lines.push(line(
            LineKind::Unchanged,
            "No differences found between the directories.".to_string(),
        ));
    }

    let mut diagnostics = Vec::new();
    diagnostics.extend(old.diagnostics.iter().map(|d| format!("old: {d}")));
    diagnostics.extend(new.diagnostics.iter().map(|d| format!("new: {d}")));

    ComparisonReport {
        lines,
        old_total: old.total_size,
        new_total: new.total_size,
        delta,
        diagnostics,
        duration_ms: None,
        timestamp: None,
        peak_memory_bytes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snap(files: &[(&str, u64)]) -> Snapshot {
        let entries: BTreeMap<String, u64> = files
            .iter()
            .map(|(path, size)| (path.to_string(), *size))
            .collect();
        let total_size = entries.values().sum();

        Snapshot {
            entries,
            total_size,
            diagnostics: Vec::new(),
        }
    }

    fn kinds(report: &ComparisonReport) -> Vec<LineKind> {
        report.lines.iter().map(|l| l.kind).collect()
    }

    fn texts_of(report: &ComparisonReport, kind: LineKind) -> Vec<&str> {
        report
            .lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    #[test]
    fn identical_snapshots_report_no_differences() {
        let old = snap(&[("a.txt", 100), ("b.txt", 200)]);
        let new = snap(&[("a.txt", 100), ("b.txt", 200)]);

        let report = compare(&old, &new);

        assert_eq!(report.delta, 0);
        assert_eq!(
            kinds(&report),
            vec![
                LineKind::Header,
                LineKind::Header,
                LineKind::Header,
                LineKind::Unchanged
            ]
        );
    }

    #[test]
    fn empty_snapshots_report_zero_totals() {
        let report = compare(&snap(&[]), &snap(&[]));

        assert_eq!(report.lines[0].text, "Old directory size: 0.00 bytes");
        assert_eq!(report.lines[1].text, "New directory size: 0.00 bytes");
        assert_eq!(report.lines[2].text, "Size difference: 0.00 bytes");
        assert_eq!(report.lines[3].kind, LineKind::Unchanged);
    }

    #[test]
    fn missing_file_listed_under_missing_section() {
        let report = compare(&snap(&[("gone.txt", 10)]), &snap(&[]));

        assert!(report
            .lines
            .iter()
            .any(|l| l.kind == LineKind::Header && l.text == "Missing files:"));
        assert_eq!(texts_of(&report, LineKind::Missing), vec!["gone.txt"]);
        assert!(texts_of(&report, LineKind::Added).is_empty());
        assert!(texts_of(&report, LineKind::Unchanged).is_empty());
    }

    #[test]
    fn added_file_listed_under_added_section() {
        let report = compare(&snap(&[]), &snap(&[("fresh.txt", 10)]));

        assert!(report
            .lines
            .iter()
            .any(|l| l.kind == LineKind::Header && l.text == "Added files:"));
        assert_eq!(texts_of(&report, LineKind::Added), vec!["fresh.txt"]);
        assert!(texts_of(&report, LineKind::Missing).is_empty());
    }

    #[test]
    fn modified_file_reports_both_sizes() {
        let report = compare(&snap(&[("app.bin", 1000)]), &snap(&[("app.bin", 2500)]));

        assert_eq!(
            texts_of(&report, LineKind::Modified),
            vec!["Modified: app.bin (1.00 kB -> 2.50 kB)"]
        );
        assert!(texts_of(&report, LineKind::Unchanged).is_empty());
    }

    #[test]
    fn unchanged_common_file_not_reported_as_modified() {
        let report = compare(
            &snap(&[("same.txt", 300), ("grew.txt", 1)]),
            &snap(&[("same.txt", 300), ("grew.txt", 2)]),
        );

        let modified = texts_of(&report, LineKind::Modified);
        assert_eq!(modified.len(), 1);
        assert!(modified[0].contains("grew.txt"));
    }

    #[test]
    fn paths_sorted_lexicographically() {
        let report = compare(
            &snap(&[("zebra.txt", 1), ("apple.txt", 1), ("mango.txt", 1)]),
            &snap(&[]),
        );

        assert_eq!(
            texts_of(&report, LineKind::Missing),
            vec!["apple.txt", "mango.txt", "zebra.txt"]
        );
    }

    #[test]
    fn sections_follow_fixed_order() {
        let report = compare(
            &snap(&[("common.txt", 1), ("gone.txt", 5)]),
            &snap(&[("common.txt", 2), ("fresh.txt", 5)]),
        );

        assert_eq!(
            kinds(&report),
            vec![
                LineKind::Header,
                LineKind::Header,
                LineKind::Header,
                LineKind::Header, // "Missing files:"
                LineKind::Missing,
                LineKind::Header, // "Added files:"
                LineKind::Added,
                LineKind::Modified,
            ]
        );
    }

    #[test]
    fn swapping_sides_swaps_missing_and_added_and_negates_delta() {
        let old = snap(&[("only-old.txt", 70), ("both.txt", 10)]);
        let new = snap(&[("only-new.txt", 30), ("both.txt", 25)]);

        let forward = compare(&old, &new);
        let backward = compare(&new, &old);

        assert_eq!(
            texts_of(&forward, LineKind::Missing),
            texts_of(&backward, LineKind::Added)
        );
        assert_eq!(
            texts_of(&forward, LineKind::Added),
            texts_of(&backward, LineKind::Missing)
        );
        assert_eq!(forward.delta, -backward.delta);
        assert_eq!(
            texts_of(&forward, LineKind::Modified).len(),
            texts_of(&backward, LineKind::Modified).len()
        );
    }

    #[test]
    fn shrinking_tree_reports_negative_delta() {
        // old {a: 100, b: 200}, new {a: 100, c: 50} per the scenario this
        // tool exists for: one file gone, one added, net -250 bytes
        let old = snap(&[("a.txt", 100), ("b.txt", 200)]);
        let new = snap(&[("a.txt", 100), ("c.txt", 50)]);

        let report = compare(&old, &new);

        assert_eq!(texts_of(&report, LineKind::Missing), vec!["b.txt"]);
        assert_eq!(texts_of(&report, LineKind::Added), vec!["c.txt"]);
        assert!(texts_of(&report, LineKind::Modified).is_empty());
        assert_eq!(report.delta, -250);
        assert_eq!(report.lines[2].text, "Size difference: -250.00 bytes");
    }

    #[test]
    fn snapshot_diagnostics_carried_onto_report() {
        let mut old = snap(&[("a.txt", 1)]);
        old.diagnostics.push("skipping x: permission denied".to_string());
        let new = snap(&[("a.txt", 1)]);

        let report = compare(&old, &new);

        assert_eq!(
            report.diagnostics,
            vec!["old: skipping x: permission denied"]
        );
    }
}
