//! In-memory tabular data.

/// A named grid of textual cells, as produced by the file loader.
///
/// Cells are textualized when the file is read; `None` marks a missing value.
/// The grid is read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from column names and rows. Rows shorter than the
    /// header are padded with missing cells.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), None);
        }
        Table { columns, rows }
    }

    /// The column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-null values of a column, each with its zero-based row index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.rows.iter().enumerate().filter_map(move |(row, cells)| {
            cells
                .get(index)
                .and_then(|cell| cell.as_deref())
                .map(|value| (row, value))
        })
    }
}
