//! Per-call join statistics.

use serde::{Deserialize, Serialize};

use crate::group_sort::GroupSortResult;

/// Shape of one join call, derived from the group-sorted sides.
///
/// `unmatched_left` / `unmatched_right` count rows without a partner on the
/// other side, whether or not the join kind keeps them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub left_rows: usize,
    pub right_rows: usize,
    pub max_groups: usize,
    pub output_rows: usize,
    pub matched_groups: usize,
    pub unmatched_left: usize,
    pub unmatched_right: usize,
    pub key_compactions: usize,
}

impl JoinStats {
    #[must_use]
    pub fn from_groups(left: &GroupSortResult, right: &GroupSortResult) -> Self {
        let mut stats = Self {
            left_rows: left.len(),
            right_rows: right.len(),
            max_groups: left.max_groups(),
            unmatched_left: left.sentinel_count(),
            unmatched_right: right.sentinel_count(),
            ..Self::default()
        };
        for group in 0..left.max_groups() {
            match (left.group_count(group), right.group_count(group)) {
                (0, 0) => {}
                (lc, 0) => stats.unmatched_left += lc,
                (0, rc) => stats.unmatched_right += rc,
                _ => stats.matched_groups += 1,
            }
        }
        stats
    }

    #[must_use]
    pub const fn with_output_rows(mut self, output_rows: usize) -> Self {
        self.output_rows = output_rows;
        self
    }

    #[must_use]
    pub const fn with_key_compactions(mut self, key_compactions: usize) -> Self {
        self.key_compactions = key_compactions;
        self
    }

    /// Rows that found a partner on the other side.
    #[must_use]
    pub const fn matched_left(&self) -> usize {
        self.left_rows - self.unmatched_left
    }

    /// The same statistics with the two sides exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            left_rows: self.right_rows,
            right_rows: self.left_rows,
            unmatched_left: self.unmatched_right,
            unmatched_right: self.unmatched_left,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_sort::group_sort_index;

    #[test]
    fn counts_matched_and_unmatched() {
        let left = group_sort_index(&[0, 0, 1, -1], 3).unwrap();
        let right = group_sort_index(&[0, 2], 3).unwrap();
        let stats = JoinStats::from_groups(&left, &right).with_output_rows(2);
        assert_eq!(stats.matched_groups, 1);
        assert_eq!(stats.unmatched_left, 2, "case=group_and_sentinel");
        assert_eq!(stats.unmatched_right, 1);
        assert_eq!(stats.matched_left(), 2);

        let swapped = stats.swapped();
        assert_eq!(swapped.left_rows, 2);
        assert_eq!(swapped.unmatched_left, 1);
        assert_eq!(swapped.output_rows, 2);
    }
}
