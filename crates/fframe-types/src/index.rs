//! Ordered column-name index: a bijection between names and positions.

use hashbrown::HashMap;

use fframe_error::{FrameError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build an index from names in order.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] if a name repeats.
    pub fn try_from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut builder = ColumnIndexBuilder::default();
        for name in names {
            builder.add(name)?;
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn builder() -> ColumnIndexBuilder {
        ColumnIndexBuilder::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[must_use]
    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Names in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

/// Incremental builder for [`ColumnIndex`]; positions are assigned in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndexBuilder {
    inner: ColumnIndex,
}

impl ColumnIndexBuilder {
    /// Append `name` and return its position.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] if the name is already present.
    pub fn add(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.inner.positions.contains_key(&name) {
            return Err(FrameError::DuplicateColumn(name));
        }
        let position = self.inner.names.len();
        self.inner.positions.insert(name.clone(), position);
        self.inner.names.push(name);
        Ok(position)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn build(self) -> ColumnIndex {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_insertion_order() {
        let index = ColumnIndex::try_from_names(["key", "lval", "rval"]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.position("rval"), Some(2));
        assert_eq!(index.name(1), Some("lval"));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["key", "lval", "rval"]);
        assert!(index.position("missing").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = ColumnIndex::try_from_names(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, FrameError::DuplicateColumn("a".to_owned()));
    }

    #[test]
    fn builder_contains_tracks_added_names() {
        let mut builder = ColumnIndex::builder();
        assert_eq!(builder.add("x").unwrap(), 0);
        assert!(builder.contains("x"));
        assert!(!builder.contains("y"));
        assert_eq!(builder.build().len(), 1);
    }
}
