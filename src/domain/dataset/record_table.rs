// ============================================================
// RECORD TABLE TYPES
// ============================================================
// In-memory tabular data loaded from CSV and cleaned in place

use serde::{Deserialize, Serialize};

use super::ColumnKind;

/// A single value in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Missing,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Real(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Key used to group rows by this value. Missing values have no key.
    pub fn group_key(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Integer(v) => Some(v.to_string()),
            Cell::Real(v) => Some(v.to_string()),
            Cell::Text(v) => Some(v.clone()),
        }
    }
}

/// Ordered rows sharing one header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTable {
    /// Column names in file order
    pub columns: Vec<String>,

    /// Row values, each aligned with `columns`
    pub rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate the values of one column
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn column_kind(&self, index: usize) -> ColumnKind {
        ColumnKind::infer_cells(self.column_cells(index))
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Append a column, one cell per existing row
    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Overwrite a column in place, or append it when absent
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) {
        match self.column_index(name) {
            Some(index) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[index] = cell;
                }
            }
            None => self.push_column(name, cells),
        }
    }

    /// Remove a column by name. Returns false when it was not there.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };

        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Rename every column through `rename`
    pub fn rename_columns<F>(&mut self, rename: F)
    where
        F: Fn(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| rename(c)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordTable {
        let mut table = RecordTable::new(vec!["a".into(), "b".into()]);
        table.push_row(vec![Cell::Integer(1), Cell::Text("x".into())]);
        table.push_row(vec![Cell::Integer(2), Cell::Missing]);
        table
    }

    #[test]
    fn test_drop_column() {
        let mut table = sample();
        assert!(table.drop_column("a"));
        assert_eq!(table.columns, vec!["b".to_string()]);
        assert_eq!(table.rows[0], vec![Cell::Text("x".into())]);
        assert!(!table.drop_column("a"));
    }

    #[test]
    fn test_push_column() {
        let mut table = sample();
        table.push_column("c", vec![Cell::Real(0.5), Cell::Missing]);
        assert_eq!(table.column_index("c"), Some(2));
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.column_kind(2), ColumnKind::Real);
    }

    #[test]
    fn test_group_key_skips_missing() {
        assert_eq!(Cell::Missing.group_key(), None);
        assert_eq!(Cell::Text("Clothing".into()).group_key().as_deref(), Some("Clothing"));
        assert_eq!(Cell::Real(f64::NAN).as_f64(), None);
    }
}
