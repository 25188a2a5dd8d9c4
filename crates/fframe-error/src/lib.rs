//! Error types for frankenframe.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! type is [`FrameError`]. Variants are grouped into configuration errors
//! (detected before any work starts), shape errors (detected while reading
//! column data), and table-model misuse.

use thiserror::Error;

/// Primary error type for frankenframe operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    // === Configuration errors ===
    /// A requested column does not exist in one of the input tables.
    #[error("no such column: {name} (in {side} table)")]
    ColumnNotFound { name: String, side: &'static str },

    /// A join was requested without any key column.
    #[error("join requires at least one key column")]
    EmptyJoinKeys,

    /// The same column was named twice in a join key list.
    #[error("join key listed twice: {0}")]
    DuplicateJoinKey(String),

    /// A join configuration value is out of range.
    #[error("invalid join configuration: {0}")]
    InvalidConfig(String),

    // === Shape errors ===
    /// A column's length disagrees with the row count of its table.
    #[error("column {column} has {len} values but the table has {rows} rows")]
    ShapeMismatch {
        column: String,
        len: usize,
        rows: usize,
    },

    // === Table model misuse ===
    /// A value of the wrong type was written into a typed column.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A row position is outside the column.
    #[error("row {row} out of bounds for length {len}")]
    RowOutOfBounds { row: usize, len: usize },

    /// A column position is outside the table.
    #[error("column position {position} out of bounds for {len} columns")]
    ColumnOutOfBounds { position: usize, len: usize },

    /// A column name was added twice to the same index.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Internal logic error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FrameError {
    /// Create an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a column-not-found error for the given side of a join.
    pub fn column_not_found(name: impl Into<String>, side: &'static str) -> Self {
        Self::ColumnNotFound {
            name: name.into(),
            side,
        }
    }

    /// Whether the error was raised before any data was touched.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound { .. }
                | Self::EmptyJoinKeys
                | Self::DuplicateJoinKey(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Whether the error reports inconsistent column lengths.
    pub const fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

/// Result type alias using `FrameError`.
pub type Result<T> = std::result::Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FrameError::column_not_found("key", "right");
        assert_eq!(err.to_string(), "no such column: key (in right table)");

        let err = FrameError::ShapeMismatch {
            column: "k".to_owned(),
            len: 2,
            rows: 3,
        };
        assert_eq!(
            err.to_string(),
            "column k has 2 values but the table has 3 rows"
        );

        let err = FrameError::DuplicateJoinKey("k".to_owned());
        assert_eq!(err.to_string(), "join key listed twice: k");
    }

    #[test]
    fn classification() {
        assert!(FrameError::EmptyJoinKeys.is_configuration_error());
        assert!(FrameError::InvalidConfig("x".to_owned()).is_configuration_error());
        assert!(FrameError::DuplicateJoinKey("k".to_owned()).is_configuration_error());
        assert!(!FrameError::DuplicateColumn("a".to_owned()).is_configuration_error());

        let shape = FrameError::ShapeMismatch {
            column: "k".to_owned(),
            len: 0,
            rows: 1,
        };
        assert!(shape.is_shape_error());
        assert!(!shape.is_configuration_error());
    }

    #[test]
    fn internal_constructor() {
        let err = FrameError::internal("pair arrays disagree");
        assert!(matches!(err, FrameError::Internal(ref m) if m == "pair arrays disagree"));
    }
}
