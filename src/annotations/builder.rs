//! Maps parsed profiler statistics onto notebook source positions
//!
//! For every code cell with a report entry, one record is emitted per
//! in-bounds report line (in report order), followed by a single cell summary
//! anchored at the cell's last line. Cells and lines that cannot be placed are
//! skipped and counted; they never fail the build.

use tracing::{debug, info};

use crate::classification::{classify, format_duration, format_percent, ClassifierInput};
use crate::notebook::NotebookCell;
use crate::report::structs::{CellStats, LineStats, ProfileReport};
use super::structs::{AnnotationKind, AnnotationRecord, AnnotationSet, BuildStats};

/// Editor columns count UTF-16 code units
fn display_width(line: &str) -> usize {
    line.encode_utf16().count()
}

/// Convert a 1-based, string-encoded line number into an index into `line_count` lines
fn line_index(key: &str, line_count: usize) -> Option<usize> {
    let number = key.trim().parse::<usize>().ok()?;
    let index = number.checked_sub(1)?;
    (index < line_count).then_some(index)
}

fn line_record(index: usize, source_line: &str, stats: &LineStats) -> AnnotationRecord {
    let category = classify(&ClassifierInput::from(stats));
    AnnotationRecord {
        line: index,
        column: display_width(source_line),
        text: format!(
            "\u{23f1} {} | \u{26a1} {}%",
            format_duration(stats.time),
            format_percent(stats.percent)
        ),
        color: category.color(),
        category,
        kind: AnnotationKind::Line,
    }
}

fn summary_record(index: usize, source_line: &str, stats: &CellStats) -> AnnotationRecord {
    let category = classify(&ClassifierInput::from(stats));
    AnnotationRecord {
        line: index,
        column: display_width(source_line),
        text: format!(
            " | Total time: \u{23f1} {} | Total hits: {} | Classification: {}",
            format_duration(stats.total_time),
            stats.total_hits.unwrap_or(0),
            category
        ),
        color: category.color(),
        category,
        kind: AnnotationKind::CellSummary,
    }
}

/// Produce the ordered records for one cell's source text
pub fn annotate_cell(source: &str, stats: &CellStats, build_stats: &mut BuildStats) -> Vec<AnnotationRecord> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut records = Vec::with_capacity(stats.lines.len() + 1);

    for (key, line_stats) in &stats.lines {
        let Some(line_stats) = line_stats else {
            build_stats.lines_skipped += 1;
            continue;
        };
        let Some(index) = line_index(key, lines.len()) else {
            debug!(line = %key, line_count = lines.len(), "Report line outside cell source, skipping");
            build_stats.lines_skipped += 1;
            continue;
        };
        records.push(line_record(index, lines[index], line_stats));
        build_stats.line_records += 1;
    }

    // split always yields at least one element
    let last = lines.len() - 1;
    records.push(summary_record(last, lines[last], stats));
    records
}

/// Build annotation records for every annotatable cell of a notebook
pub fn build_annotations(cells: &[NotebookCell], report: &ProfileReport) -> AnnotationSet {
    let mut set = AnnotationSet::default();

    for (position, cell) in cells.iter().enumerate() {
        set.stats.cells_seen += 1;

        if !cell.is_code() {
            set.stats.cells_skipped += 1;
            continue;
        }
        let Some(stats) = report.cell(position) else {
            debug!(cell = position, "No report entry for cell, skipping");
            set.stats.cells_skipped += 1;
            continue;
        };
        let Some(source) = cell.source.as_deref() else {
            debug!(cell = position, "Cell source unavailable, skipping");
            set.stats.cells_skipped += 1;
            continue;
        };

        let records = annotate_cell(source, stats, &mut set.stats);
        set.documents.insert(cell.document.clone(), records);
        set.stats.cells_annotated += 1;
    }

    info!(
        documents = set.len(),
        line_records = set.stats.line_records,
        cells_skipped = set.stats.cells_skipped,
        lines_skipped = set.stats.lines_skipped,
        "Built notebook annotations"
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{AnnotationColor, Category};
    use crate::notebook::DocumentId;
    use crate::report::parse_report;

    fn doc(index: usize) -> DocumentId {
        DocumentId::new("nb.ipynb", index)
    }

    fn three_line_report() -> ProfileReport {
        parse_report(
            br#"{"cells": [{
                "total_time": 50000, "total_hits": 3, "percent_time": 12.0,
                "lines": {
                    "1": {"time": 10000, "percent": 20.0, "hits": 1},
                    "3": {"time": 40000, "percent": 25.0, "hits": 1},
                    "7": {"time": 1, "percent": 0.0}
                }
            }]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_three_line_cell_anchors() {
        let cells = vec![NotebookCell::code(doc(0), "a = 1\nb = 2\nprint(a + b)")];
        let set = build_annotations(&cells, &three_line_report());

        let records = set.get(&doc(0)).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().map(|r| r.line).collect::<Vec<_>>(), vec![0, 2, 2]);
        assert_eq!(records[0].column, 5);
        assert_eq!(records[1].column, 12);
        assert_eq!(records[2].kind, AnnotationKind::CellSummary);
        assert_eq!(set.stats.line_records, 2);
        assert_eq!(set.stats.lines_skipped, 1);
    }

    #[test]
    fn test_record_texts() {
        let cells = vec![NotebookCell::code(doc(0), "a = 1\nb = 2\nprint(a + b)")];
        let set = build_annotations(&cells, &three_line_report());
        let records = set.get(&doc(0)).unwrap();

        assert_eq!(records[0].text, "\u{23f1} 1.00 ms | \u{26a1} 20.00%");
        // 40000 raw units per hit
        assert_eq!(records[1].category, Category::CpuIntensive);
        assert_eq!(records[1].color, AnnotationColor::Orange);
        assert_eq!(
            records[2].text,
            " | Total time: \u{23f1} 5.00 ms | Total hits: 3 | Classification: CPU-Intensive"
        );
    }

    #[test]
    fn test_missing_percent_renders_na() {
        let report = parse_report(br#"{"cells": [{"lines": {"1": {"time": 20}}}]}"#).unwrap();
        let cells = vec![NotebookCell::code(doc(0), "x = 1")];
        let set = build_annotations(&cells, &report);
        let records = set.get(&doc(0)).unwrap();

        assert_eq!(records[0].text, "\u{23f1} 2.00 \u{00b5}s | \u{26a1} N/A%");
        assert_eq!(
            records[1].text,
            " | Total time: \u{23f1} N/A | Total hits: 0 | Classification: Normal"
        );
        assert_eq!(records[1].color, AnnotationColor::Gray);
    }

    #[test]
    fn test_skips_non_code_and_unmatched_cells() {
        let report = parse_report(
            br#"{"cells": [{"total_time": 1}, {"total_time": 1}, null]}"#,
        )
        .unwrap();
        let cells = vec![
            NotebookCell::markdown(doc(0), "# heading"),
            NotebookCell::code(doc(1), "x = 1"),
            NotebookCell::code(doc(2), "y = 2"),
            NotebookCell::code(doc(3), "z = 3"),
            NotebookCell {
                document: doc(4),
                kind: crate::notebook::CellKind::Code,
                source: None,
            },
        ];

        let set = build_annotations(&cells, &report);
        assert_eq!(set.len(), 1);
        assert!(set.get(&doc(1)).is_some());
        assert_eq!(set.stats.cells_seen, 5);
        assert_eq!(set.stats.cells_annotated, 1);
        assert_eq!(set.stats.cells_skipped, 4);
    }

    #[test]
    fn test_report_line_order_is_preserved() {
        let report = parse_report(
            br#"{"cells": [{"lines": {"2": {"time": 5}, "1": {"time": 5}}}]}"#,
        )
        .unwrap();
        let cells = vec![NotebookCell::code(doc(0), "a\nb")];
        let set = build_annotations(&cells, &report);
        let lines: Vec<usize> = set.get(&doc(0)).unwrap().iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 0, 1]);
    }

    #[test]
    fn test_trailing_newline_moves_summary_to_empty_line() {
        let report = parse_report(br#"{"cells": [{"lines": {"1": {"time": 5}}}]}"#).unwrap();
        let cells = vec![NotebookCell::code(doc(0), "x = 1\n")];
        let set = build_annotations(&cells, &report);
        let summary = set.get(&doc(0)).unwrap().last().unwrap().clone();
        assert_eq!(summary.line, 1);
        assert_eq!(summary.column, 0);
    }

    #[test]
    fn test_line_zero_and_garbage_keys_are_skipped() {
        let report = parse_report(
            br#"{"cells": [{"lines": {"0": {"time": 5}, "abc": {"time": 5}, "1": null}}]}"#,
        )
        .unwrap();
        let cells = vec![NotebookCell::code(doc(0), "x = 1")];
        let set = build_annotations(&cells, &report);
        assert_eq!(set.get(&doc(0)).unwrap().len(), 1);
        assert_eq!(set.stats.lines_skipped, 3);
    }

    #[test]
    fn test_undecodable_line_is_skipped_and_counted() {
        let report = parse_report(
            br#"{"cells": [{"total_time": 50000, "total_hits": 3,
                "lines": {"1": {"time": 10000}, "2": {"time": "fast"}}}]}"#,
        )
        .unwrap();
        let cells = vec![NotebookCell::code(doc(0), "a = 1\nb = 2")];
        let set = build_annotations(&cells, &report);

        let records = set.get(&doc(0)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 0);
        assert_eq!(records[1].kind, AnnotationKind::CellSummary);
        assert_eq!(set.stats.line_records, 1);
        assert_eq!(set.stats.lines_skipped, 1);
    }

    #[test]
    fn test_column_counts_utf16_units() {
        let report = parse_report(br#"{"cells": [{"lines": {"1": {"time": 5}}}]}"#).unwrap();
        let cells = vec![NotebookCell::code(doc(0), "s = '\u{1F600}\u{00e9}'")];
        let set = build_annotations(&cells, &report);
        // 5 ascii + emoji (2 units) + e-acute (1 unit) + closing quote
        assert_eq!(set.get(&doc(0)).unwrap()[0].column, 9);
    }

    #[test]
    fn test_line_records_never_exceed_report_entries() {
        let report = three_line_report();
        let cells = vec![NotebookCell::code(doc(0), "a = 1\nb = 2\nprint(a + b)")];
        let set = build_annotations(&cells, &report);
        let entries = report.cell(0).unwrap().lines.len();
        let line_records = set
            .get(&doc(0))
            .unwrap()
            .iter()
            .filter(|r| r.kind == AnnotationKind::Line)
            .count();
        assert!(line_records <= entries);
        assert_eq!(line_records + set.stats.lines_skipped, entries);
    }

    #[test]
    fn test_category_counts() {
        let report = parse_report(
            br#"{"cells": [{"percent_time": 90}, {"total_time": 10}, {"memory_delta_mb": 2.5}]}"#,
        )
        .unwrap();
        let cells = vec![
            NotebookCell::code(doc(0), "a"),
            NotebookCell::code(doc(1), "b"),
            NotebookCell::code(doc(2), "c"),
        ];
        let counts = build_annotations(&cells, &report).category_counts();
        assert_eq!(counts[0], (Category::PerformanceCritical, 1));
        assert_eq!(counts[3], (Category::MemoryIntensive, 1));
        assert_eq!(counts[4], (Category::Normal, 1));
    }
}
