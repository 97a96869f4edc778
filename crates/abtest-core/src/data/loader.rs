//! Workbook loading
//!
//! Reads one sheet of an `.xlsx`/`.xls`/`.ods` workbook into a [`Dataset`].
//! The first row is the header; every following row is a record.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use tracing::{debug, info};

use super::{Cell, Column, Dataset};
use crate::{AnalysisOptions, StatsError, StatsResult};

/// Load a single sheet
pub fn load_sheet(path: impl AsRef<Path>, sheet: &str) -> StatsResult<Dataset> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let range = sheet_range(&mut workbook, sheet)?;
    let dataset = dataset_from_range(sheet, &range)?;
    info!(
        path = %path.display(),
        sheet,
        rows = dataset.n_rows(),
        cols = dataset.n_cols(),
        "loaded sheet"
    );
    Ok(dataset)
}

/// Load the control and test sheets named in `options`.
///
/// Both sheets must carry the metric column.
pub fn load_groups(
    path: impl AsRef<Path>,
    options: &AnalysisOptions,
) -> StatsResult<(Dataset, Dataset)> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let control = sheet_range(&mut workbook, &options.control_sheet)?;
    let test = sheet_range(&mut workbook, &options.test_sheet)?;
    info!(path = %path.display(), "loaded group sheets");
    groups_from_ranges(&control, &test, options)
}

/// Build the control and test datasets from their worksheet ranges
pub fn groups_from_ranges(
    control: &Range<Data>,
    test: &Range<Data>,
    options: &AnalysisOptions,
) -> StatsResult<(Dataset, Dataset)> {
    let control = dataset_from_range(&options.control_sheet, control)?;
    let test = dataset_from_range(&options.test_sheet, test)?;
    for dataset in [&control, &test] {
        dataset.require_column(&options.metric)?;
        info!(
            sheet = %dataset.name,
            rows = dataset.n_rows(),
            cols = dataset.n_cols(),
            "group dataset ready"
        );
    }
    Ok((control, test))
}

/// Fail with `SheetNotFound` unless `sheet` is one of `names`
pub fn require_sheet(names: &[String], sheet: &str) -> StatsResult<()> {
    if names.iter().any(|s| s == sheet) {
        Ok(())
    } else {
        Err(StatsError::SheetNotFound {
            sheet: sheet.to_string(),
        })
    }
}

fn sheet_range(
    workbook: &mut Sheets<BufReader<File>>,
    sheet: &str,
) -> StatsResult<Range<Data>> {
    require_sheet(&workbook.sheet_names(), sheet)?;
    Ok(workbook.worksheet_range(sheet)?)
}

/// Convert a worksheet range into a dataset
pub fn dataset_from_range(name: &str, range: &Range<Data>) -> StatsResult<Dataset> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| StatsError::EmptySheet {
        sheet: name.to_string(),
    })?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| header_name(i, cell))
        .collect();
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];

    for row in rows {
        // Trailing blank lines inside the used range are not records
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        for (column, value) in cells.iter_mut().zip(row) {
            column.push(to_cell(value));
        }
    }

    debug!(sheet = name, columns = ?names, "parsed header");
    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    Dataset::new(name, columns)
}

fn header_name(index: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {index}"),
        Data::String(s) if s.trim().is_empty() => format!("Unnamed: {index}"),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) if s.trim().is_empty() => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Missing,
    }
}
