//! Plain-text rendering of a [`Projection`].

use crate::projection::Projection;
use std::fmt::Write;

const HEADING: &str = "Results (lower is better)";
const TOTAL_LABEL: &str = "Overall Time";
const MISSING: &str = "-";

/// Render `p` as an aligned text table: a header of column labels, the overall-time
/// row, then one row per test case.
pub fn text_table(p: &Projection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADING}");
    if p.is_empty() {
        let _ = writeln!(out, "Empty");
        return out;
    }

    let mut lines: Vec<Vec<String>> = Vec::with_capacity(p.rows.len() + 2);
    lines.push(
        std::iter::once(String::new())
            .chain(p.column_titles.iter().map(|c| c.label.clone()))
            .collect(),
    );
    lines.push(
        std::iter::once(TOTAL_LABEL.to_string())
            .chain(p.overall_totals.iter().map(|t| t.to_string()))
            .collect(),
    );
    for row in &p.rows {
        lines.push(
            std::iter::once(row.test_case.clone())
                .chain(row.cells.iter().map(|c| match c {
                    Some(cell) => cell.display(),
                    None => MISSING.to_string(),
                }))
                .collect(),
        );
    }

    let columns = p.column_titles.len() + 1;
    let widths: Vec<usize> = (0..columns)
        .map(|i| lines.iter().map(|l| l[i].chars().count()).max().unwrap_or(0))
        .collect();

    for line in &lines {
        let mut text = format!("{:<w$}", line[0], w = widths[0]);
        for (value, width) in line.iter().zip(&widths).skip(1) {
            let _ = write!(text, "  {value:>width$}");
        }
        let _ = writeln!(out, "{}", text.trim_end());
    }
    out
}
