//! Plain-text table rendering with row/column elision

use std::fmt;

/// A rectangular text table with a row index column
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub index: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            ..Default::default()
        }
    }

    pub fn push_row(&mut self, index: impl Into<String>, row: Vec<String>) {
        self.index.push(index.into());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render, eliding middle rows/columns beyond the given limits
    pub fn render(&self, max_rows: usize, max_columns: usize) -> String {
        let cols = visible(self.headers.len(), max_columns);
        let rows = visible(self.rows.len(), max_rows);

        let pick = |cells: &[String]| -> Vec<String> {
            cols.iter()
                .map(|c| match c {
                    Some(i) => cells.get(*i).cloned().unwrap_or_default(),
                    None => "...".to_string(),
                })
                .collect()
        };

        let mut lines: Vec<(String, Vec<String>)> = Vec::with_capacity(rows.len() + 1);
        lines.push((String::new(), pick(&self.headers)));
        for r in &rows {
            match r {
                Some(i) => lines.push((self.index[*i].clone(), pick(&self.rows[*i]))),
                None => lines.push(("...".into(), vec!["...".to_string(); cols.len()])),
            }
        }

        let index_width = lines.iter().map(|(i, _)| i.len()).max().unwrap_or(0);
        let widths: Vec<usize> = (0..cols.len())
            .map(|c| lines.iter().map(|(_, l)| l[c].len()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for (index, cells) in &lines {
            let mut line = format!("{index:<index_width$}");
            for (cell, width) in cells.iter().zip(&widths) {
                line.push_str(&format!("  {cell:>width$}"));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(usize::MAX, usize::MAX))
    }
}

/// Positions to show; `None` marks the elision point
fn visible(len: usize, max: usize) -> Vec<Option<usize>> {
    if len <= max {
        return (0..len).map(Some).collect();
    }
    let head = max.div_ceil(2);
    let tail = max / 2;
    (0..head)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((len - tail..len).map(Some))
        .collect()
}
