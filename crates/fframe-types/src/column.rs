//! Typed columns and their positional builder.

use std::sync::Arc;

use fframe_error::{FrameError, Result};

use crate::bitmap::NullBitmap;
use crate::value::{ColumnType, Value};

/// Physical storage of a column. NA slots hold a default placeholder; the
/// validity bitmap is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Bool(Vec<bool>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Text(Vec<Arc<str>>),
    Mixed(Vec<Value>),
}

impl ColumnData {
    fn with_len(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Bool => Self::Bool(vec![false; len]),
            ColumnType::Int64 => Self::Int64(vec![0; len]),
            ColumnType::Float64 => Self::Float64(vec![0.0; len]),
            ColumnType::Text => Self::Text(vec![Arc::from(""); len]),
            ColumnType::Mixed => Self::Mixed(vec![Value::Na; len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Mixed(v) => v.len(),
        }
    }

    const fn column_type(&self) -> ColumnType {
        match self {
            Self::Bool(_) => ColumnType::Bool,
            Self::Int64(_) => ColumnType::Int64,
            Self::Float64(_) => ColumnType::Float64,
            Self::Text(_) => ColumnType::Text,
            Self::Mixed(_) => ColumnType::Mixed,
        }
    }
}

/// An immutable column: typed data plus validity.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    data: ColumnData,
    validity: NullBitmap,
}

impl Column {
    /// Assemble a column from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShapeMismatch`] when the bitmap and the data
    /// disagree on length.
    pub fn try_new(data: ColumnData, validity: NullBitmap) -> Result<Self> {
        if data.len() != validity.len() {
            return Err(FrameError::ShapeMismatch {
                column: "<validity>".to_owned(),
                len: validity.len(),
                rows: data.len(),
            });
        }
        Ok(Self { data, validity })
    }

    /// A column of `len` NA slots.
    #[must_use]
    pub fn new_na(column_type: ColumnType, len: usize) -> Self {
        Self {
            data: ColumnData::with_len(column_type, len),
            validity: NullBitmap::all_null(len),
        }
    }

    pub fn from_i64s(values: impl IntoIterator<Item = i64>) -> Self {
        let values: Vec<i64> = values.into_iter().collect();
        let validity = NullBitmap::all_valid(values.len());
        Self {
            data: ColumnData::Int64(values),
            validity,
        }
    }

    pub fn from_f64s(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        let validity = NullBitmap::all_valid(values.len());
        Self {
            data: ColumnData::Float64(values),
            validity,
        }
    }

    pub fn from_bools(values: impl IntoIterator<Item = bool>) -> Self {
        let values: Vec<bool> = values.into_iter().collect();
        let validity = NullBitmap::all_valid(values.len());
        Self {
            data: ColumnData::Bool(values),
            validity,
        }
    }

    pub fn from_strs<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        let values: Vec<Arc<str>> = values
            .into_iter()
            .map(|s| Arc::from(s.as_ref()))
            .collect();
        let validity = NullBitmap::all_valid(values.len());
        Self {
            data: ColumnData::Text(values),
            validity,
        }
    }

    /// Integer column where `None` marks NA.
    pub fn from_opt_i64s(values: impl IntoIterator<Item = Option<i64>>) -> Self {
        let (values, valid): (Vec<i64>, Vec<bool>) = values
            .into_iter()
            .map(|v| (v.unwrap_or_default(), v.is_some()))
            .unzip();
        Self {
            data: ColumnData::Int64(values),
            validity: NullBitmap::from_bools(&valid),
        }
    }

    /// Float column where `None` marks NA.
    pub fn from_opt_f64s(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let (values, valid): (Vec<f64>, Vec<bool>) = values
            .into_iter()
            .map(|v| (v.unwrap_or_default(), v.is_some()))
            .unzip();
        Self {
            data: ColumnData::Float64(values),
            validity: NullBitmap::from_bools(&valid),
        }
    }

    /// Text column where `None` marks NA.
    pub fn from_opt_strs<S: AsRef<str>>(values: impl IntoIterator<Item = Option<S>>) -> Self {
        let (values, valid): (Vec<Arc<str>>, Vec<bool>) = values
            .into_iter()
            .map(|v| match v {
                Some(s) => (Arc::from(s.as_ref()), true),
                None => (Arc::from(""), false),
            })
            .unzip();
        Self {
            data: ColumnData::Text(values),
            validity: NullBitmap::from_bools(&valid),
        }
    }

    /// Build a column from loose values, inferring its type.
    ///
    /// Values of a single type produce a typed column; mixed types produce a
    /// [`ColumnType::Mixed`] column; an all-NA input produces a text column.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Self {
        let valid: Vec<bool> = values.iter().map(|v| !v.is_na()).collect();
        let data = match infer_type(values) {
            ColumnType::Bool => {
                ColumnData::Bool(values.iter().map(|v| matches!(v, Value::Bool(true))).collect())
            }
            ColumnType::Int64 => {
                ColumnData::Int64(values.iter().map(|v| v.as_i64().unwrap_or_default()).collect())
            }
            ColumnType::Float64 => ColumnData::Float64(
                values
                    .iter()
                    .map(|v| v.as_f64().unwrap_or_default())
                    .collect(),
            ),
            ColumnType::Text => ColumnData::Text(
                values
                    .iter()
                    .map(|v| match v {
                        Value::Text(s) => Arc::clone(s),
                        _ => Arc::from(""),
                    })
                    .collect(),
            ),
            ColumnType::Mixed => ColumnData::Mixed(values.to_vec()),
        };
        Self {
            data,
            validity: NullBitmap::from_bools(&valid),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    #[must_use]
    pub const fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub const fn validity(&self) -> &NullBitmap {
        &self.validity
    }

    /// Whether `row` is NA. Rows past the end are NA.
    #[must_use]
    pub fn is_na(&self, row: usize) -> bool {
        !self.validity.is_valid(row)
    }

    /// The value at `row`; [`Value::Na`] for missing or out-of-range rows.
    #[must_use]
    pub fn get(&self, row: usize) -> Value {
        if self.is_na(row) {
            return Value::Na;
        }
        match &self.data {
            ColumnData::Bool(v) => Value::Bool(v[row]),
            ColumnData::Int64(v) => Value::Int(v[row]),
            ColumnData::Float64(v) => Value::Float(v[row]),
            ColumnData::Text(v) => Value::Text(Arc::clone(&v[row])),
            ColumnData::Mixed(v) => v[row].clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|row| self.get(row))
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        self.validity.null_count()
    }
}

fn infer_type(values: &[Value]) -> ColumnType {
    let mut inferred = None;
    for value in values {
        match (inferred, value.value_type()) {
            (_, None) => {}
            (None, Some(t)) => inferred = Some(t),
            (Some(prev), Some(t)) if prev != t => return ColumnType::Mixed,
            _ => {}
        }
    }
    inferred.unwrap_or(ColumnType::Text)
}

/// Fixed-length positional builder. Every slot starts out NA.
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    data: ColumnData,
    validity: NullBitmap,
}

impl ColumnBuilder {
    #[must_use]
    pub fn new(column_type: ColumnType, len: usize) -> Self {
        Self {
            data: ColumnData::with_len(column_type, len),
            validity: NullBitmap::all_null(len),
        }
    }

    /// A builder of the same type as `column`.
    #[must_use]
    pub fn like(column: &Column, len: usize) -> Self {
        Self::new(column.column_type(), len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.len() {
            return Err(FrameError::RowOutOfBounds {
                row,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Copy `source[source_row]` into `row`. NA copies as NA.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::RowOutOfBounds`] for a bad position and
    /// [`FrameError::TypeMismatch`] when a typed builder receives a value of
    /// another type. Mixed builders accept anything.
    pub fn set_from(&mut self, row: usize, source: &Column, source_row: usize) -> Result<()> {
        self.check_row(row)?;
        if source_row >= source.len() {
            return Err(FrameError::RowOutOfBounds {
                row: source_row,
                len: source.len(),
            });
        }
        if source.is_na(source_row) {
            self.validity.set_valid(row, false);
            return Ok(());
        }
        match (&mut self.data, &source.data) {
            (ColumnData::Bool(dst), ColumnData::Bool(src)) => dst[row] = src[source_row],
            (ColumnData::Int64(dst), ColumnData::Int64(src)) => dst[row] = src[source_row],
            (ColumnData::Float64(dst), ColumnData::Float64(src)) => dst[row] = src[source_row],
            (ColumnData::Text(dst), ColumnData::Text(src)) => {
                dst[row] = Arc::clone(&src[source_row]);
            }
            (ColumnData::Mixed(dst), _) => dst[row] = source.get(source_row),
            (dst, src) => {
                return Err(FrameError::TypeMismatch {
                    expected: dst.column_type().to_string(),
                    found: src.column_type().to_string(),
                });
            }
        }
        self.validity.set_valid(row, true);
        Ok(())
    }

    /// Write a loose value into `row`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ColumnBuilder::set_from`].
    pub fn set_value(&mut self, row: usize, value: Value) -> Result<()> {
        self.check_row(row)?;
        match (&mut self.data, value) {
            (_, Value::Na) => {
                self.validity.set_valid(row, false);
                return Ok(());
            }
            (ColumnData::Bool(dst), Value::Bool(v)) => dst[row] = v,
            (ColumnData::Int64(dst), Value::Int(v)) => dst[row] = v,
            (ColumnData::Float64(dst), Value::Float(v)) => dst[row] = v,
            (ColumnData::Text(dst), Value::Text(v)) => dst[row] = v,
            (ColumnData::Mixed(dst), v) => dst[row] = v,
            (dst, v) => {
                return Err(FrameError::TypeMismatch {
                    expected: dst.column_type().to_string(),
                    found: v
                        .value_type()
                        .map_or_else(|| "NA".to_owned(), |t| t.to_string()),
                });
            }
        }
        self.validity.set_valid(row, true);
        Ok(())
    }

    /// Mark `row` as NA.
    pub fn set_na(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.validity.set_valid(row, false);
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> Column {
        Column {
            data: self.data,
            validity: self.validity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_opt_tracks_validity() {
        let col = Column::from_opt_i64s([Some(1), None, Some(3)]);
        assert_eq!(col.len(), 3);
        assert_eq!(col.get(0), Value::Int(1));
        assert!(col.is_na(1));
        assert_eq!(col.get(1), Value::Na);
        assert_eq!(col.null_count(), 1);
        assert!(col.is_na(7), "case=out_of_range_is_na");
    }

    #[test]
    fn from_values_infers_type() {
        let col = Column::from_values(&[Value::Na, Value::text("a"), Value::text("b")]);
        assert_eq!(col.column_type(), ColumnType::Text);
        assert_eq!(col.get(2), Value::text("b"));

        let mixed = Column::from_values(&[Value::Int(1), Value::text("a")]);
        assert_eq!(mixed.column_type(), ColumnType::Mixed);
        assert_eq!(mixed.get(0), Value::Int(1));

        let empty = Column::from_values(&[]);
        assert_eq!(empty.column_type(), ColumnType::Text);
        assert!(empty.is_empty());
    }

    #[test]
    fn from_values_fills_every_inferred_type() {
        let ints = Column::from_values(&[Value::Int(7), Value::Na, Value::Int(-2)]);
        assert_eq!(ints.column_type(), ColumnType::Int64);
        assert_eq!(ints.iter().collect::<Vec<_>>(), vec![
            Value::Int(7),
            Value::Na,
            Value::Int(-2)
        ]);

        let floats = Column::from_values(&[Value::Na, Value::Float(0.5)]);
        assert_eq!(floats.column_type(), ColumnType::Float64);
        assert_eq!(floats.null_count(), 1);
        assert_eq!(floats.get(1), Value::Float(0.5));

        let bools = Column::from_values(&[Value::Bool(true), Value::Bool(false)]);
        assert_eq!(bools.column_type(), ColumnType::Bool);
        assert_eq!(bools.get(0), Value::Bool(true));
        assert_eq!(bools.get(1), Value::Bool(false));

        let mixed = Column::from_values(&[Value::Bool(true), Value::Na, Value::Float(1.5)]);
        assert_eq!(mixed.column_type(), ColumnType::Mixed);
        assert!(mixed.is_na(1), "case=mixed_na_slot");
        assert_eq!(mixed.get(2), Value::Float(1.5));
    }

    #[test]
    fn builder_starts_na_and_copies() {
        let source = Column::from_strs(["x", "y"]);
        let mut builder = ColumnBuilder::like(&source, 3);
        builder.set_from(2, &source, 0).unwrap();
        let col = builder.finish();
        assert!(col.is_na(0));
        assert!(col.is_na(1));
        assert_eq!(col.get(2), Value::text("x"));
    }

    #[test]
    fn builder_rejects_type_mismatch() {
        let source = Column::from_f64s([1.5]);
        let mut builder = ColumnBuilder::new(ColumnType::Int64, 1);
        let err = builder.set_from(0, &source, 0).unwrap_err();
        assert_eq!(
            err,
            FrameError::TypeMismatch {
                expected: "int64".to_owned(),
                found: "float64".to_owned(),
            }
        );
    }

    #[test]
    fn mixed_builder_accepts_anything() {
        let ints = Column::from_i64s([7]);
        let texts = Column::from_strs(["z"]);
        let mut builder = ColumnBuilder::new(ColumnType::Mixed, 2);
        builder.set_from(0, &ints, 0).unwrap();
        builder.set_from(1, &texts, 0).unwrap();
        let col = builder.finish();
        assert_eq!(col.get(0), Value::Int(7));
        assert_eq!(col.get(1), Value::text("z"));
    }

    #[test]
    fn builder_bounds_checked() {
        let source = Column::from_i64s([1]);
        let mut builder = ColumnBuilder::like(&source, 1);
        assert!(matches!(
            builder.set_from(1, &source, 0),
            Err(FrameError::RowOutOfBounds { row: 1, len: 1 })
        ));
        assert!(matches!(
            builder.set_from(0, &source, 5),
            Err(FrameError::RowOutOfBounds { row: 5, len: 1 })
        ));
        assert!(builder.set_na(3).is_err());
    }

    #[test]
    fn na_source_clears_previous_value() {
        let source = Column::from_opt_i64s([Some(4), None]);
        let mut builder = ColumnBuilder::like(&source, 1);
        builder.set_from(0, &source, 0).unwrap();
        builder.set_from(0, &source, 1).unwrap();
        assert!(builder.finish().is_na(0));
    }
}
