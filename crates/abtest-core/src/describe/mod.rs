//! Descriptive statistics
//!
//! - Column dtype inference and non-null counts
//! - Summary statistics (count, mean, std, min, quartiles, max)
//! - Missing value analysis
//! - Rendered dataset overview

pub mod table;

pub use table::Table;

use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::data::{Cell, Column, Dataset};
use crate::DisplayOptions;

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric, integral and without missing values
    Int64,
    /// Numeric (missing values allowed)
    Float64,
    /// Contains text
    Object,
}

impl ColumnKind {
    /// An empty column has no values to type and reports `object`
    pub fn infer(column: &Column) -> Self {
        if column.is_empty() {
            return ColumnKind::Object;
        }
        let mut integral = true;
        for cell in &column.cells {
            match cell {
                Cell::Text(_) => return ColumnKind::Object,
                Cell::Missing => integral = false,
                Cell::Number(x) => integral &= x.fract() == 0.0,
            }
        }
        if integral {
            ColumnKind::Int64
        } else {
            ColumnKind::Float64
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Object)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnKind::Int64 => "int64",
            ColumnKind::Float64 => "float64",
            ColumnKind::Object => "object",
        })
    }
}

/// Per-column structural information
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub kind: ColumnKind,
}

/// Summary statistics of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Missing value count and percentage of one column
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValues {
    pub name: String,
    pub missing: usize,
    /// Percentage of rows, rounded to 2 decimals
    pub ratio: f64,
}

pub fn info(dataset: &Dataset) -> Vec<ColumnInfo> {
    dataset
        .columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name.clone(),
            non_null: c.len() - c.null_count(),
            kind: ColumnKind::infer(c),
        })
        .collect()
}

/// Summary statistics for every numeric column, in column order
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .iter()
        .filter(|c| ColumnKind::infer(c).is_numeric())
        .filter_map(|c| Some(summarize(&c.name, c.numeric_values()?)))
        .collect()
}

fn summarize(name: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let (mean, std) = match count {
        0 => (f64::NAN, f64::NAN),
        _ => {
            let mean = values.iter().sum::<f64>() / count as f64;
            let std = if count > 1 {
                (values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>()
                    / (count as f64 - 1.0))
                    .sqrt()
            } else {
                f64::NAN
            };
            (mean, std)
        }
    };

    ColumnSummary {
        name: name.to_string(),
        count,
        mean,
        std,
        min: quantile(&values, 0.0),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: quantile(&values, 1.0),
    }
}

/// Linearly interpolated quantile of sorted data
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Columns with at least one missing value, ascending by count
pub fn missing_values(dataset: &Dataset) -> Vec<MissingValues> {
    let rows = dataset.n_rows();
    let mut out: Vec<MissingValues> = dataset
        .columns()
        .iter()
        .filter_map(|c| {
            let missing = c.null_count();
            (missing > 0).then(|| MissingValues {
                name: c.name.clone(),
                missing,
                ratio: (missing as f64 / rows as f64 * 100.0 * 100.0).round() / 100.0,
            })
        })
        .collect();
    // Stable: ties keep column order
    out.sort_by_key(|m| m.missing);
    out
}

fn format_float(x: f64, precision: usize) -> String {
    if x.is_nan() {
        "NaN".into()
    } else {
        format!("{x:.precision$}")
    }
}

fn format_cell(cell: &Cell, kind: ColumnKind, precision: usize) -> String {
    match (cell, kind) {
        (Cell::Missing, _) => "NaN".into(),
        (Cell::Text(s), _) => s.clone(),
        (Cell::Number(x), ColumnKind::Int64) => format!("{}", *x as i64),
        (Cell::Number(x), _) => format_float(*x, precision),
    }
}

/// Rows `range` of the dataset as a table indexed by row position
pub fn rows_table(dataset: &Dataset, range: Range<usize>, precision: usize) -> Table {
    let kinds: Vec<ColumnKind> = dataset.columns().iter().map(ColumnKind::infer).collect();
    let mut table = Table::new(dataset.columns().iter().map(|c| c.name.clone()).collect());
    for i in range {
        let row = dataset
            .row(i)
            .into_iter()
            .zip(&kinds)
            .map(|(cell, kind)| format_cell(cell, *kind, precision))
            .collect();
        table.push_row(i.to_string(), row);
    }
    table
}

pub fn head(dataset: &Dataset, n: usize, precision: usize) -> Table {
    rows_table(dataset, 0..n.min(dataset.n_rows()), precision)
}

pub fn tail(dataset: &Dataset, n: usize, precision: usize) -> Table {
    let rows = dataset.n_rows();
    rows_table(dataset, rows.saturating_sub(n)..rows, precision)
}

/// Transposed summary: one row per numeric column
pub fn summary_table(summaries: &[ColumnSummary], precision: usize) -> Table {
    let headers = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let mut table = Table::new(headers.iter().map(|h| h.to_string()).collect());
    for s in summaries {
        let row = [
            s.count as f64,
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max,
        ]
        .iter()
        .map(|x| format_float(*x, precision))
        .collect();
        table.push_row(s.name.clone(), row);
    }
    table
}

pub fn missing_table(missing: &[MissingValues]) -> Table {
    let mut table = Table::new(vec!["Total Missing Values".into(), "Ratio".into()]);
    for m in missing {
        table.push_row(
            m.name.clone(),
            vec![m.missing.to_string(), format!("{:.2}", m.ratio)],
        );
    }
    table
}

fn banner(title: &str) -> String {
    format!("*************** {title} ***************\n")
}

/// Full overview of one dataset: shape, types, samples, summary, missing values
pub fn check_dataset(dataset: &Dataset, options: &DisplayOptions) -> String {
    let DisplayOptions {
        head_rows,
        max_rows,
        max_columns,
        precision,
    } = *options;
    debug!(dataset = %dataset.name, rows = dataset.n_rows(), "describing dataset");

    let columns = info(dataset);
    let mut out = String::new();

    out.push_str(&banner("Dataset Shape"));
    out.push_str(&format!(
        "No. of Rows: {}\nNo. of Columns: {}\n",
        dataset.n_rows(),
        dataset.n_cols()
    ));

    out.push_str(&banner("Dataset Information"));
    let mut info_table = Table::new(vec!["Column".into(), "Non-Null Count".into(), "Dtype".into()]);
    for (i, c) in columns.iter().enumerate() {
        info_table.push_row(
            i.to_string(),
            vec![c.name.clone(), format!("{} non-null", c.non_null), c.kind.to_string()],
        );
    }
    out.push_str(&info_table.render(max_rows, max_columns));

    out.push_str(&banner("Types of Columns"));
    let name_width = columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for c in &columns {
        out.push_str(&format!("{:<name_width$}  {}\n", c.name, c.kind));
    }

    out.push_str(&banner(&format!("First {head_rows} Rows")));
    out.push_str(&head(dataset, head_rows, precision).render(max_rows, max_columns));

    out.push_str(&banner(&format!("Last {head_rows} Rows")));
    out.push_str(&tail(dataset, head_rows, precision).render(max_rows, max_columns));

    out.push_str(&banner("Summary Statistics of The Dataset"));
    out.push_str(&summary_table(&describe(dataset), precision).render(max_rows, max_columns));

    out.push_str(&banner("Dataset Missing Values Analysis"));
    let missing = missing_table(&missing_values(dataset));
    if missing.is_empty() {
        out.push_str("No missing values\n");
    } else {
        out.push_str(&missing.render(max_rows, max_columns));
    }

    out
}
