//! Rebuild reading-order text lines from unordered positioned runs.

use std::collections::BTreeMap;

use crate::glyph::Page;

/// Reassemble pages of positioned runs into the ordered, whitespace-normalized
/// lines a person reading the document would see.
///
/// Runs meant to share one visual row drift by fractions of a point, so rows
/// are keyed by the vertical coordinate rounded to the nearest integer. Rows
/// read top to bottom (PDF y grows upward, hence descending y), runs within a
/// row left to right. Ties never fall back to input-arrival order: equal x
/// resolves by text, so the output is identical however the backend happened
/// to emit the runs. Runs without a finite coordinate are skipped, and rows
/// that are empty after trimming are dropped.
///
/// Never fails; an empty document simply yields no lines.
pub fn reconstruct(pages: &[Page]) -> Vec<String> {
    let mut lines = Vec::new();

    for page in pages {
        // BTreeMap keeps row keys sorted; reverse iteration gives top-to-bottom.
        let mut rows: BTreeMap<i64, Vec<(f64, &str)>> = BTreeMap::new();
        for run in page {
            if !run.x.is_finite() || !run.y.is_finite() {
                continue;
            }
            rows.entry(run.y.round() as i64)
                .or_default()
                .push((run.x, run.text.as_str()));
        }

        for (_, mut row) in rows.into_iter().rev() {
            row.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));
            let joined = row.iter().map(|(_, text)| *text).collect::<Vec<_>>().join(" ");
            let line = joined.split_whitespace().collect::<Vec<_>>().join(" ");
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphRun;

    fn run(text: &str, x: f64, y: f64) -> GlyphRun {
        GlyphRun::new(text, x, y)
    }

    #[test]
    fn test_rows_read_top_to_bottom_and_left_to_right() {
        let page = vec![
            run("BALANCE", 300.0, 700.0),
            run("150.00", 200.0, 650.0),
            run("DATE", 10.0, 700.0),
            run("01 JAN 2024", 10.0, 650.0),
        ];

        let lines = reconstruct(&[page]);
        assert_eq!(lines, vec!["DATE BALANCE", "01 JAN 2024 150.00"]);
    }

    #[test]
    fn test_sub_pixel_drift_collapses_into_one_row() {
        let page = vec![
            run("left", 10.0, 699.8),
            run("right", 20.0, 700.2),
        ];

        let lines = reconstruct(&[page]);
        assert_eq!(lines, vec!["left right"]);
    }

    #[test]
    fn test_runs_without_finite_coordinates_are_excluded() {
        let page = vec![
            run("kept", 10.0, 100.0),
            run("no-y", 20.0, f64::NAN),
            run("no-x", f64::NAN, 100.0),
        ];

        let lines = reconstruct(&[page]);
        assert_eq!(lines, vec!["kept"]);
    }

    #[test]
    fn test_whitespace_is_normalized_and_empty_rows_dropped() {
        let page = vec![
            run("  POS   Settlement ", 10.0, 100.0),
            run("GROCERY  STORE", 120.0, 100.0),
            run("   ", 10.0, 50.0),
        ];

        let lines = reconstruct(&[page]);
        assert_eq!(lines, vec!["POS Settlement GROCERY STORE"]);
    }

    #[test]
    fn test_pages_concatenate_in_order() {
        let first = vec![run("page one", 10.0, 700.0)];
        let second = vec![run("page two", 10.0, 700.0)];

        let lines = reconstruct(&[first, second]);
        assert_eq!(lines, vec!["page one", "page two"]);
    }

    #[test]
    fn test_order_is_independent_of_run_arrival_order() {
        let forward = vec![
            run("a", 10.0, 100.0),
            run("b", 20.0, 100.0),
            run("c", 10.0, 50.0),
        ];
        let mut shuffled = forward.clone();
        shuffled.reverse();

        assert_eq!(reconstruct(&[forward]), reconstruct(&[shuffled]));
    }

    #[test]
    fn test_equal_coordinates_resolve_by_text() {
        let a = vec![run("beta", 10.0, 100.0), run("alpha", 10.0, 100.0)];
        let b = vec![run("alpha", 10.0, 100.0), run("beta", 10.0, 100.0)];

        assert_eq!(reconstruct(&[a.clone()]), vec!["alpha beta"]);
        assert_eq!(reconstruct(&[a]), reconstruct(&[b]));
    }

    #[test]
    fn test_empty_document_yields_no_lines() {
        assert!(reconstruct(&[]).is_empty());
        assert!(reconstruct(&[vec![]]).is_empty());
    }
}
