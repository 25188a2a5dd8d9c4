//! Single cell values.

use std::fmt;
use std::sync::Arc;

/// Physical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    Text,
    /// Heterogeneous column holding arbitrary [`Value`]s.
    Mixed,
}

impl ColumnType {
    /// Stable label used in error messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Text => "text",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value. [`Value::Na`] marks a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Na,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
}

impl Value {
    /// Build a text value.
    pub fn text(s: impl AsRef<str>) -> Self {
        Self::Text(Arc::from(s.as_ref()))
    }

    #[must_use]
    pub const fn is_na(&self) -> bool {
        matches!(self, Self::Na)
    }

    /// The column type this value naturally belongs to, or `None` for NA.
    #[must_use]
    pub const fn value_type(&self) -> Option<ColumnType> {
        match self {
            Self::Na => None,
            Self::Bool(_) => Some(ColumnType::Bool),
            Self::Int(_) => Some(ColumnType::Int64),
            Self::Float(_) => Some(ColumnType::Float64),
            Self::Text(_) => Some(ColumnType::Text),
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Na => f.write_str("NA"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::text(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(Arc::from(v))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Na, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_missing_as_na() {
        assert_eq!(Value::Na.to_string(), "NA");
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(Value::from(3_i64).to_string(), "3");
        assert_eq!(Value::from(None::<i64>), Value::Na);
    }

    #[test]
    fn value_type_follows_variant() {
        assert_eq!(Value::Na.value_type(), None);
        assert_eq!(Value::Int(1).value_type(), Some(ColumnType::Int64));
        assert_eq!(Value::text("x").value_type(), Some(ColumnType::Text));
        assert_eq!(ColumnType::Float64.to_string(), "float64");
    }
}
