//! Table projection of a [`ResultStore`].
//!
//! The projection is recomputed from scratch on every call: one column per report in
//! arrival order, one row per registered test case (first-seen order) whose name contains
//! the filter text, and an overall total per column over the rows that passed the filter.
//! Samples are taken to be seconds and displayed as whole milliseconds.

use crate::stats::{round_to_hundredths, summarize, to_millis, MillisSummary, Summary};
use crate::store::ResultStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTitle {
    pub name: String,
    pub version: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub summary: Summary,
    pub millis: MillisSummary,
    /// `round(median * 1000)`.
    pub median_ms: i64,
    /// Slowdown against the fastest column of the row, in percent with two decimals.
    /// `None` for the fastest column itself.
    pub relative_percent: Option<f64>,
    /// Position of this median between the row's fastest (0.0) and slowest (1.0) median.
    pub scale: f64,
}

impl Cell {
    /// `"150 (50.00%)"`, or just `"100"` for the fastest column.
    pub fn display(&self) -> String {
        match self.relative_percent {
            Some(p) => format!("{} ({:.2}%)", self.median_ms, p),
            None => self.median_ms.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub test_case: String,
    /// One entry per column; `None` where the report has no samples for this test case.
    pub cells: Vec<Option<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub column_titles: Vec<ColumnTitle>,
    pub rows: Vec<Row>,
    /// Sum of `median_ms` per column over the rendered rows only, saturating at `i64::MAX`.
    pub overall_totals: Vec<i64>,
}

impl Projection {
    /// No report has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.column_titles.is_empty()
    }
}

/// Project `store` into a table, keeping test cases whose name contains `filter`.
///
/// Matching is a case-sensitive substring test; an empty filter keeps every row.
pub fn project(store: &ResultStore, filter: &str) -> Projection {
    let reports = store.reports();

    let column_titles = reports
        .iter()
        .map(|r| ColumnTitle {
            name: r.name.clone(),
            version: r.version.clone(),
            label: format!("{} {}", r.name, r.version),
        })
        .collect();

    let mut overall_totals = vec![0i64; reports.len()];
    let mut rows = Vec::new();

    for test_case in store.test_cases().iter() {
        if !test_case.contains(filter) {
            continue;
        }

        let summaries: Vec<Option<Summary>> = reports
            .iter()
            .map(|r| r.samples(test_case).and_then(summarize))
            .collect();

        let medians = summaries.iter().flatten().map(|s| s.median);
        let min_median = medians.clone().fold(f64::INFINITY, f64::min);
        let max_median = medians.fold(f64::NEG_INFINITY, f64::max);

        let cells: Vec<Option<Cell>> = summaries
            .into_iter()
            .map(|s| s.map(|summary| cell(summary, min_median, max_median)))
            .collect();

        for (total, cell) in overall_totals.iter_mut().zip(&cells) {
            if let Some(cell) = cell {
                *total = total.saturating_add(cell.median_ms);
            }
        }

        rows.push(Row {
            test_case: test_case.to_string(),
            cells,
        });
    }

    Projection {
        column_titles,
        rows,
        overall_totals,
    }
}

fn cell(summary: Summary, min_median: f64, max_median: f64) -> Cell {
    let median = summary.median;

    // A zero baseline has no meaningful ratio.
    let relative_percent = if median == min_median || min_median <= 0.0 {
        None
    } else {
        Some(round_to_hundredths(((median / min_median) - 1.0) * 100.0))
    };

    let scale = if max_median > min_median {
        (median - min_median) / (max_median - min_median)
    } else {
        0.0
    };

    Cell {
        summary,
        millis: summary.to_millis(),
        median_ms: to_millis(median),
        relative_percent,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SampleBatch;

    fn batch(entries: &[(&str, &[f64])]) -> SampleBatch {
        entries.iter().map(|(k, v)| (*k, v.to_vec())).collect()
    }

    fn sample_store() -> ResultStore {
        let mut store = ResultStore::new();
        store
            .update(
                "React",
                "15",
                batch(&[
                    ("table/[100,4]/render", &[0.100, 0.100]),
                    ("table/[100,4]/filter/32", &[0.020]),
                    ("tree/[10,10]/render", &[0.050]),
                ]),
            )
            .unwrap();
        store
            .update(
                "kivi",
                "advanced",
                batch(&[
                    ("table/[100,4]/render", &[0.150]),
                    ("tree/[10,10]/render", &[0.040]),
                ]),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_columns_follow_arrival_order() {
        let p = project(&sample_store(), "");
        let labels: Vec<&str> = p.column_titles.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["React 15", "kivi advanced"]);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_relative_percent_against_fastest() {
        let p = project(&sample_store(), "table/[100,4]/render");
        assert_eq!(p.rows.len(), 1);

        let cells = &p.rows[0].cells;
        let fast = cells[0].as_ref().unwrap();
        let slow = cells[1].as_ref().unwrap();

        assert_eq!(fast.median_ms, 100);
        assert_eq!(fast.relative_percent, None);
        assert_eq!(fast.scale, 0.0);

        assert_eq!(slow.median_ms, 150);
        assert_eq!(slow.relative_percent, Some(50.0));
        assert_eq!(slow.display(), "150 (50.00%)");
        assert!((slow.scale - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_relative_percent_rounds_to_two_decimals() {
        let mut store = ResultStore::new();
        store.update("A", "1", batch(&[("t", &[0.003])])).unwrap();
        store.update("B", "1", batch(&[("t", &[0.004])])).unwrap();
        store.update("C", "1", batch(&[("t", &[0.005])])).unwrap();

        let p = project(&store, "");
        let cells: Vec<&Cell> = p.rows[0].cells.iter().flatten().collect();

        assert_eq!(cells[0].relative_percent, None);
        assert_eq!(cells[1].relative_percent, Some(33.33));
        assert_eq!(cells[1].display(), "4 (33.33%)");
        // 66.666... rounds up at the second decimal
        assert_eq!(cells[2].relative_percent, Some(66.67));
        assert_eq!(cells[2].display(), "5 (66.67%)");
    }

    #[test]
    fn test_huge_medians_saturate_totals() {
        let mut store = ResultStore::new();
        store
            .update("A", "1", batch(&[("t1", &[1e17]), ("t2", &[1e17])]))
            .unwrap();
        store.update("B", "1", batch(&[("t1", &[0.010])])).unwrap();

        let p = project(&store, "");
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.rows[0].cells[0].as_ref().unwrap().median_ms, i64::MAX);
        assert_eq!(p.overall_totals, vec![i64::MAX, 10]);
    }

    #[test]
    fn test_missing_cell_is_none() {
        let p = project(&sample_store(), "filter");
        assert_eq!(p.rows.len(), 1);
        assert!(p.rows[0].cells[0].is_some());
        assert!(p.rows[0].cells[1].is_none());
        // single present cell is its own minimum
        assert_eq!(p.rows[0].cells[0].as_ref().unwrap().relative_percent, None);
    }

    #[test]
    fn test_filter_selects_substring_matches() {
        let store = sample_store();
        let all = project(&store, "");
        let names = |p: &Projection| -> Vec<String> {
            p.rows.iter().map(|r| r.test_case.clone()).collect()
        };

        assert_eq!(
            names(&all),
            [
                "table/[100,4]/render",
                "table/[100,4]/filter/32",
                "tree/[10,10]/render"
            ]
        );

        for filter in ["render", "table", "[10,", "Render", "nothing"] {
            let filtered = names(&project(&store, filter));
            let expected: Vec<String> = names(&all)
                .into_iter()
                .filter(|n| n.contains(filter))
                .collect();
            assert_eq!(filtered, expected);
            assert!(filtered.iter().all(|n| names(&all).contains(n)));
        }

        assert!(project(&store, "Render").rows.is_empty());
    }

    #[test]
    fn test_totals_only_count_filtered_rows() {
        let store = sample_store();

        let all = project(&store, "");
        assert_eq!(all.overall_totals, vec![100 + 20 + 50, 150 + 40]);

        let render = project(&store, "render");
        assert_eq!(render.overall_totals, vec![100 + 50, 150 + 40]);

        let none = project(&store, "zzz");
        assert_eq!(none.overall_totals, vec![0, 0]);
    }

    #[test]
    fn test_empty_store() {
        let p = project(&ResultStore::new(), "");
        assert!(p.is_empty());
        assert!(p.rows.is_empty());
        assert!(p.overall_totals.is_empty());
    }

    #[test]
    fn test_tie_for_fastest_has_no_annotation() {
        let mut store = ResultStore::new();
        store.update("A", "1", batch(&[("t", &[0.010])])).unwrap();
        store.update("B", "1", batch(&[("t", &[0.010])])).unwrap();

        let p = project(&store, "");
        for cell in p.rows[0].cells.iter().flatten() {
            assert_eq!(cell.relative_percent, None);
            assert_eq!(cell.scale, 0.0);
        }
    }
}
