//! Tables: named, equal-length columns plus an optional record index.

use fframe_error::{FrameError, Result};

use crate::column::{Column, ColumnBuilder};
use crate::index::{ColumnIndex, ColumnIndexBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    column_index: ColumnIndex,
    columns: Vec<Column>,
    rows: usize,
    /// Row labels. `None` means the default `0..rows` labels.
    record_index: Option<Column>,
}

impl Table {
    /// Build a table from names and columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShapeMismatch`] when the columns disagree on
    /// length or the name count differs from the column count, and
    /// [`FrameError::DuplicateColumn`] when a name repeats.
    pub fn new<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let column_index = ColumnIndex::try_from_names(names)?;
        if column_index.len() != columns.len() {
            return Err(FrameError::ShapeMismatch {
                column: "<names>".to_owned(),
                len: column_index.len(),
                rows: columns.len(),
            });
        }
        let rows = columns.first().map_or(0, Column::len);
        for (position, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(FrameError::ShapeMismatch {
                    column: column_index.name(position).unwrap_or_default().to_owned(),
                    len: column.len(),
                    rows,
                });
            }
        }
        Ok(Self {
            column_index,
            columns,
            rows,
            record_index: None,
        })
    }

    /// A table with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            column_index: ColumnIndex::default(),
            columns: Vec::new(),
            rows: 0,
            record_index: None,
        }
    }

    /// Start a positional builder for a table of `rows` rows.
    #[must_use]
    pub fn builder(rows: usize) -> TableBuilder {
        TableBuilder::new(rows)
    }

    /// Replace the record index (row labels).
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShapeMismatch`] if the labels do not cover
    /// exactly `rows()` rows.
    pub fn with_record_index(mut self, labels: Column) -> Result<Self> {
        if labels.len() != self.rows {
            return Err(FrameError::ShapeMismatch {
                column: "<record index>".to_owned(),
                len: labels.len(),
                rows: self.rows,
            });
        }
        self.record_index = Some(labels);
        Ok(self)
    }

    /// Explicit row labels, if any were set.
    #[must_use]
    pub const fn record_index(&self) -> Option<&Column> {
        self.record_index.as_ref()
    }

    /// Row labels, materializing the default `0..rows` labels when unset.
    #[must_use]
    pub fn record_labels(&self) -> Column {
        self.record_index.clone().unwrap_or_else(|| {
            Column::from_i64s((0..self.rows).map(|row| row as i64))
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub const fn column_index(&self) -> &ColumnIndex {
        &self.column_index
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.column_index.names()
    }

    /// Column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.column_index
            .position(name)
            .and_then(|position| self.columns.get(position))
    }

    /// Column by position.
    #[must_use]
    pub fn get_at(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }
}

/// Positional table builder: columns are declared first, then filled cell by
/// cell with [`TableBuilder::set`] / [`TableBuilder::set_na`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    rows: usize,
    column_index: ColumnIndexBuilder,
    columns: Vec<ColumnBuilder>,
}

impl TableBuilder {
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            column_index: ColumnIndexBuilder::default(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Whether a column named `name` has already been added.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column_index.contains(name)
    }

    /// Append a column and return its position.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShapeMismatch`] if the builder length differs
    /// from the table's row count and [`FrameError::DuplicateColumn`] if the
    /// name is taken.
    pub fn add(&mut self, name: impl Into<String>, column: ColumnBuilder) -> Result<usize> {
        let name = name.into();
        if column.len() != self.rows {
            return Err(FrameError::ShapeMismatch {
                column: name,
                len: column.len(),
                rows: self.rows,
            });
        }
        let position = self.column_index.add(name)?;
        self.columns.push(column);
        Ok(position)
    }

    fn column_mut(&mut self, col: usize) -> Result<&mut ColumnBuilder> {
        let len = self.columns.len();
        self.columns
            .get_mut(col)
            .ok_or(FrameError::ColumnOutOfBounds { position: col, len })
    }

    /// Copy `source[source_row]` into cell `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, source: &Column, source_row: usize) -> Result<()> {
        self.column_mut(col)?.set_from(row, source, source_row)
    }

    /// Mark cell `(row, col)` as NA.
    pub fn set_na(&mut self, row: usize, col: usize) -> Result<()> {
        self.column_mut(col)?.set_na(row)
    }

    #[must_use]
    pub fn build(self) -> Table {
        Table {
            column_index: self.column_index.build(),
            columns: self.columns.into_iter().map(ColumnBuilder::finish).collect(),
            rows: self.rows,
            record_index: None,
        }
    }
}
