//! Tabular group records
//!
//! - In-memory dataset model (cells, named columns)
//! - Workbook loading
//! - Group tagging and concatenation

pub mod combine;
pub mod loader;

pub use combine::{concat, group_means, tag_and_combine};
pub use loader::{
    dataset_from_range, groups_from_ranges, load_groups, load_sheet, require_sheet,
};

use crate::{StatsError, StatsResult};

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Missing cells and NaN numbers both count as null.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(x) => x.is_nan(),
            Cell::Text(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Number(x)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&x| Cell::Number(x)).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Non-null numeric values; `None` if any present cell is text
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        let mut out = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            match cell {
                Cell::Number(x) if !x.is_nan() => out.push(*x),
                Cell::Number(_) | Cell::Missing => {}
                Cell::Text(_) => return None,
            }
        }
        Some(out)
    }
}

/// An ordered table of rows loaded from one sheet (or combined from several)
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset; all columns must have the same length and distinct names.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> StatsResult<Self> {
        let name = name.into();
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(StatsError::InvalidInput(format!(
                    "column {} has {} rows, column {} has {}",
                    bad.name,
                    bad.len(),
                    first.name,
                    first.len()
                )));
            }
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].iter().any(|o| o.name == c.name) {
                return Err(StatsError::InvalidInput(format!(
                    "duplicate column {} in {}",
                    c.name, name
                )));
            }
        }
        Ok(Self { name, columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn require_column(&self, name: &str) -> StatsResult<&Column> {
        self.column(name).ok_or_else(|| StatsError::MissingColumn {
            column: name.to_string(),
            dataset: self.name.clone(),
        })
    }

    /// Extract a metric column as floats, skipping missing cells.
    ///
    /// Fails on the first text cell, reporting its row.
    pub fn numeric(&self, name: &str) -> StatsResult<Vec<f64>> {
        let column = self.require_column(name)?;
        let mut out = Vec::with_capacity(column.len());
        for (row, cell) in column.cells.iter().enumerate() {
            match cell {
                Cell::Number(x) if !x.is_nan() => out.push(*x),
                Cell::Number(_) | Cell::Missing => {}
                Cell::Text(s) => {
                    return Err(StatsError::NonNumeric {
                        column: name.to_string(),
                        row,
                        value: s.clone(),
                    })
                }
            }
        }
        Ok(out)
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// Copy of the dataset with `name` set to `value` on every row.
    ///
    /// An existing column of the same name is overwritten in place.
    pub fn with_constant_column(&self, name: &str, value: Cell) -> Self {
        let cells = vec![value; self.n_rows()];
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.cells = cells,
            None => columns.push(Column::new(name, cells)),
        }
        Self {
            name: self.name.clone(),
            columns,
        }
    }

    /// Rows whose `column` holds the text `label`, restricted to `metric`
    pub fn numeric_where(&self, column: &str, label: &str, metric: &str) -> StatsResult<Vec<f64>> {
        let keys = self.require_column(column)?;
        let values = self.require_column(metric)?;
        let mut out = Vec::new();
        for (row, (key, cell)) in keys.cells.iter().zip(&values.cells).enumerate() {
            if !matches!(key, Cell::Text(k) if k == label) {
                continue;
            }
            match cell {
                Cell::Number(x) if !x.is_nan() => out.push(*x),
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
        Ok(out)
    }
}
