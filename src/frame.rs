//! Columnar result frame.
//!
//! The frame is the chart-facing view of a query result: insertion-ordered
//! columns of string-rendered cells. Column names and order come from the
//! first row of a result set; a zero-row result leaves the frame with no
//! columns at all.
//!
//! Invariant: every column holds exactly one value per appended row, so all
//! column vectors are the same length at all times.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the column set. Called once, with the first row's names.
    pub fn set_columns(&mut self, names: &[String]) {
        debug_assert!(self.names.is_empty(), "column set is fixed by the first row");
        self.names = names.to_vec();
        self.columns = vec![Vec::new(); names.len()];
    }

    /// Append one rendered row, one cell per column in order.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.names.len(), "row arity must match the header");
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.push(cell);
        }
    }

    /// True when the frame has no columns (a zero-row result).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    /// Column names in first-row order.
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// The values of one column, by name.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Column-major JSON view: `{"col": ["cell", ...], ...}`.
    ///
    /// This is the shape the chart renderer inlines under `data.values`.
    pub fn values(&self) -> Value {
        let mut map = Map::new();
        for (name, column) in self.names.iter().zip(&self.columns) {
            map.insert(
                name.clone(),
                Value::Array(column.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }
}
