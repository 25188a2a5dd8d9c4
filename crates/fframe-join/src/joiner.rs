//! Row-index pairs and output materialization.

use fframe_error::{FrameError, Result};
use fframe_types::{Column, ColumnBuilder, ColumnType, Table, TableBuilder};
use tracing::debug;

use crate::config::JoinConfig;

/// Pair entry meaning "no row on this side"; materialized as NA.
pub const NO_ROW: i64 = -1;

/// Parallel left/right row-index arrays that fully determine the provenance
/// of every output row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Joiner {
    left_index: Vec<i64>,
    right_index: Vec<i64>,
}

impl Joiner {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            left_index: Vec::with_capacity(capacity),
            right_index: Vec::with_capacity(capacity),
        }
    }

    /// Wrap precomputed index arrays.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Internal`] if the arrays differ in length or
    /// contain a negative entry other than [`NO_ROW`].
    pub fn from_indices(left_index: Vec<i64>, right_index: Vec<i64>) -> Result<Self> {
        if left_index.len() != right_index.len() {
            return Err(FrameError::internal(format!(
                "index arrays differ in length: {} vs {}",
                left_index.len(),
                right_index.len()
            )));
        }
        if left_index.iter().chain(&right_index).any(|&i| i < NO_ROW) {
            return Err(FrameError::internal("negative row index in joiner"));
        }
        Ok(Self {
            left_index,
            right_index,
        })
    }

    /// Append one output row.
    pub fn push(&mut self, left: Option<usize>, right: Option<usize>) {
        self.left_index.push(left.map_or(NO_ROW, |row| row as i64));
        self.right_index.push(right.map_or(NO_ROW, |row| row as i64));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.left_index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left_index.is_empty()
    }

    /// Left source row of output row `row`, `None` for an NA fill or a
    /// position past the end.
    #[must_use]
    pub fn left_index(&self, row: usize) -> Option<usize> {
        to_row(self.left_index.get(row).copied())
    }

    #[must_use]
    pub fn right_index(&self, row: usize) -> Option<usize> {
        to_row(self.right_index.get(row).copied())
    }

    #[must_use]
    pub fn left_indices(&self) -> &[i64] {
        &self.left_index
    }

    #[must_use]
    pub fn right_indices(&self) -> &[i64] {
        &self.right_index
    }

    /// Exchange the two sides.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left_index, &mut self.right_index);
    }

    /// Materialize the output table.
    ///
    /// Columns come out in this order: one column per key in `on` (taken
    /// from `a` where the left side matched, otherwise from `b`), then the
    /// non-key columns of `a`, then the non-key columns of `b`. A `b` column
    /// whose name is already taken gets `config.right_suffix` appended, then
    /// `" 2"`, `" 3"`, ... until the name is free. Missing rows read NA.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnNotFound`] if a key is missing from either
    /// table and [`FrameError::RowOutOfBounds`] if an index points past the
    /// end of its table.
    pub fn join(&self, a: &Table, b: &Table, on: &[&str], config: &JoinConfig) -> Result<Table> {
        let rows = self.len();
        let mut builder = Table::builder(rows);

        for &name in on {
            let left = a
                .get(name)
                .ok_or_else(|| FrameError::column_not_found(name, "left"))?;
            let right = b
                .get(name)
                .ok_or_else(|| FrameError::column_not_found(name, "right"))?;
            let column = if left.column_type() == right.column_type() {
                ColumnBuilder::like(left, rows)
            } else {
                ColumnBuilder::new(ColumnType::Mixed, rows)
            };
            let col = builder.add(name, column)?;
            for (row, (&l, &r)) in self.left_index.iter().zip(&self.right_index).enumerate() {
                if l != NO_ROW {
                    builder.set(row, col, left, l as usize)?;
                } else if r != NO_ROW {
                    builder.set(row, col, right, r as usize)?;
                }
            }
        }

        for (name, column) in a.column_names().zip(a.columns()) {
            if on.contains(&name) {
                continue;
            }
            let col = builder.add(name, ColumnBuilder::like(column, rows))?;
            gather(&mut builder, col, column, &self.left_index)?;
        }

        let mut renamed = 0_usize;
        for (name, column) in b.column_names().zip(b.columns()) {
            if on.contains(&name) {
                continue;
            }
            let target = free_name(&builder, name, &config.right_suffix);
            if target != name {
                debug!(column = name, renamed_to = %target, "right column renamed");
                renamed += 1;
            }
            let col = builder.add(target, ColumnBuilder::like(column, rows))?;
            gather(&mut builder, col, column, &self.right_index)?;
        }

        debug!(
            phase = "materialize",
            output_rows = rows,
            key_columns = on.len(),
            renamed_columns = renamed,
            "materialized join output"
        );
        Ok(builder.build())
    }
}

fn to_row(index: Option<i64>) -> Option<usize> {
    index.filter(|&i| i != NO_ROW).map(|i| i as usize)
}

fn gather(builder: &mut TableBuilder, col: usize, source: &Column, indices: &[i64]) -> Result<()> {
    for (row, &index) in indices.iter().enumerate() {
        if index != NO_ROW {
            builder.set(row, col, source, index as usize)?;
        }
    }
    Ok(())
}

fn free_name(builder: &TableBuilder, name: &str, suffix: &str) -> String {
    if !builder.contains(name) {
        return name.to_owned();
    }
    let suffixed = format!("{name}{suffix}");
    if !builder.contains(&suffixed) {
        return suffixed;
    }
    (2_usize..)
        .map(|n| format!("{suffixed} {n}"))
        .find(|candidate| !builder.contains(candidate))
        .unwrap_or(suffixed)
}
