//! Group tagging and concatenation

use std::collections::BTreeMap;

use tracing::info;

use super::{Cell, Column, Dataset};
use crate::{AnalysisOptions, StatsError, StatsResult};

/// Stack datasets vertically.
///
/// Columns are matched by name in first-seen order; a dataset lacking a
/// column contributes `Missing` cells. Row order is preserved and the
/// result is indexed `0..total`.
pub fn concat(name: &str, parts: &[&Dataset]) -> StatsResult<Dataset> {
    let mut names: Vec<&str> = Vec::new();
    for part in parts {
        for column in part.columns() {
            if !names.contains(&column.name.as_str()) {
                names.push(&column.name);
            }
        }
    }

    let total: usize = parts.iter().map(|p| p.n_rows()).sum();
    let columns = names
        .into_iter()
        .map(|column| {
            let mut cells = Vec::with_capacity(total);
            for part in parts {
                match part.column(column) {
                    Some(c) => cells.extend(c.cells.iter().cloned()),
                    None => cells.extend(std::iter::repeat(Cell::Missing).take(part.n_rows())),
                }
            }
            Column::new(column, cells)
        })
        .collect();

    Dataset::new(name, columns)
}

/// Tag each group with its label and stack control rows before test rows
pub fn tag_and_combine(
    control: &Dataset,
    test: &Dataset,
    options: &AnalysisOptions,
) -> StatsResult<Dataset> {
    let control = control.with_constant_column(
        &options.group_column,
        Cell::Text(options.control_label.clone()),
    );
    let test =
        test.with_constant_column(&options.group_column, Cell::Text(options.test_label.clone()));

    let combined = concat("combined", &[&control, &test])?;
    info!(
        control_rows = control.n_rows(),
        test_rows = test.n_rows(),
        rows = combined.n_rows(),
        "combined groups"
    );
    Ok(combined)
}

/// Mean of `metric` per distinct label of `group_column`, sorted by label.
///
/// Missing metric cells are skipped; rows with a non-text label are ignored.
pub fn group_means(
    dataset: &Dataset,
    group_column: &str,
    metric: &str,
) -> StatsResult<Vec<(String, f64)>> {
    let keys = dataset.require_column(group_column)?;
    let values = dataset.require_column(metric)?;

    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (row, (key, cell)) in keys.cells.iter().zip(&values.cells).enumerate() {
        let Cell::Text(label) = key else { continue };
        let entry = sums.entry(label.as_str()).or_insert((0.0, 0));
        match cell {
            Cell::Number(x) if !x.is_nan() => {
                entry.0 += x;
                entry.1 += 1;
            }
            Cell::Number(_) | Cell::Missing => {}
            Cell::Text(s) => {
                return Err(StatsError::NonNumeric {
                    column: metric.to_string(),
                    row,
                    value: s.clone(),
                })
            }
        }
    }

    Ok(sums
        .into_iter()
        .map(|(label, (sum, count))| {
            let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
            (label.to_string(), mean)
        })
        .collect())
}
