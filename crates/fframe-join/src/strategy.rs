//! Join strategies: turn two group-sorted sides into row-index pairs.
//!
//! Each strategy decides, per group, how many pairs the group contributes and
//! which ones. [`JoinOperation::create_joiner_from_groups`] sizes the output
//! in a first pass, allocates once, then emits pairs in ascending group-code
//! order; inside a group, pairs run row-major over (left row, right row).
//! Rows carrying the sentinel code never match and come out before group 0
//! when the strategy keeps unmatched rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use fframe_error::{FrameError, Result};

use crate::group_sort::{GroupSortResult, group_sort_index};
use crate::joiner::Joiner;
use crate::keys::JoinKeys;

/// Join type requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Outer,
    Left,
    Right,
}

impl JoinKind {
    pub const ALL: [Self; 4] = [Self::Inner, Self::Outer, Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Strategy that evaluates this kind directly. `Right` has none: it runs
    /// as `Left` with the operands exchanged.
    #[must_use]
    pub fn operation(self) -> Option<&'static dyn JoinOperation> {
        match self {
            Self::Inner => Some(&InnerJoin),
            Self::Outer => Some(&OuterJoin),
            Self::Left => Some(&LeftOuterJoin),
            Self::Right => None,
        }
    }

    /// Whether every left row survives.
    #[must_use]
    pub const fn keeps_unmatched_left(self) -> bool {
        matches!(self, Self::Outer | Self::Left)
    }

    /// Whether every right row survives.
    #[must_use]
    pub const fn keeps_unmatched_right(self) -> bool {
        matches!(self, Self::Outer | Self::Right)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait JoinOperation: Send + Sync {
    fn kind(&self) -> JoinKind;

    /// Pairs contributed by a group with `left` left rows and `right` right
    /// rows; `None` on arithmetic overflow.
    fn group_size(&self, left: usize, right: usize) -> Option<usize>;

    /// Pairs contributed by the sentinel rows of each side.
    fn sentinel_size(&self, left: usize, right: usize) -> usize;

    /// Emit the pairs of one group. Slices hold original row numbers.
    fn emit_group(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner);

    /// Emit the pairs of the sentinel rows.
    fn emit_sentinels(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner);

    /// Enumerate pairs over two group-sorted sides sharing one code space.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Internal`] if the sides disagree on the number
    /// of groups or the output size overflows.
    fn create_joiner_from_groups(
        &self,
        left: &GroupSortResult,
        right: &GroupSortResult,
    ) -> Result<Joiner> {
        let max_groups = left.max_groups();
        if right.max_groups() != max_groups {
            return Err(FrameError::internal(format!(
                "group count mismatch: {} vs {}",
                max_groups,
                right.max_groups()
            )));
        }

        let overflow = || FrameError::internal(format!("{} join output size overflows", self.kind()));
        let mut size = self.sentinel_size(left.sentinel_count(), right.sentinel_count());
        for group in 0..max_groups {
            let contribution = self
                .group_size(left.group_count(group), right.group_count(group))
                .ok_or_else(overflow)?;
            size = size.checked_add(contribution).ok_or_else(overflow)?;
        }

        let mut joiner = Joiner::with_capacity(size);
        let (mut left_pos, mut right_pos) = (left.sentinel_count(), right.sentinel_count());
        self.emit_sentinels(
            &left.order()[..left_pos],
            &right.order()[..right_pos],
            &mut joiner,
        );
        for group in 0..max_groups {
            let (lc, rc) = (left.group_count(group), right.group_count(group));
            self.emit_group(
                &left.order()[left_pos..left_pos + lc],
                &right.order()[right_pos..right_pos + rc],
                &mut joiner,
            );
            left_pos += lc;
            right_pos += rc;
        }
        debug_assert_eq!(joiner.len(), size, "presized output must be exact");
        Ok(joiner)
    }

    /// Group-sort both sides of `keys` and enumerate the pairs.
    ///
    /// # Errors
    ///
    /// Same conditions as [`JoinOperation::create_joiner_from_groups`].
    fn create_joiner(&self, keys: &JoinKeys) -> Result<Joiner> {
        let left = group_sort_index(keys.left_codes(), keys.max_groups())?;
        let right = group_sort_index(keys.right_codes(), keys.max_groups())?;
        self.create_joiner_from_groups(&left, &right)
    }
}

fn cross_product(left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner) {
    for &l in left_rows {
        for &r in right_rows {
            joiner.push(Some(l), Some(r));
        }
    }
}

fn left_only(left_rows: &[usize], joiner: &mut Joiner) {
    for &l in left_rows {
        joiner.push(Some(l), None);
    }
}

fn right_only(right_rows: &[usize], joiner: &mut Joiner) {
    for &r in right_rows {
        joiner.push(None, Some(r));
    }
}

/// Matching pairs only.
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerJoin;

impl JoinOperation for InnerJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::Inner
    }

    fn group_size(&self, left: usize, right: usize) -> Option<usize> {
        left.checked_mul(right)
    }

    fn sentinel_size(&self, _left: usize, _right: usize) -> usize {
        0
    }

    fn emit_group(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner) {
        cross_product(left_rows, right_rows, joiner);
    }

    fn emit_sentinels(&self, _left_rows: &[usize], _right_rows: &[usize], _joiner: &mut Joiner) {}
}

/// Matching pairs plus every unmatched row of either side.
#[derive(Debug, Clone, Copy, Default)]
pub struct OuterJoin;

impl JoinOperation for OuterJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::Outer
    }

    fn group_size(&self, left: usize, right: usize) -> Option<usize> {
        if left > 0 && right > 0 {
            left.checked_mul(right)
        } else {
            Some(left + right)
        }
    }

    fn sentinel_size(&self, left: usize, right: usize) -> usize {
        left + right
    }

    fn emit_group(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner) {
        match (left_rows.is_empty(), right_rows.is_empty()) {
            (false, false) => cross_product(left_rows, right_rows, joiner),
            (false, true) => left_only(left_rows, joiner),
            (true, false) => right_only(right_rows, joiner),
            (true, true) => {}
        }
    }

    fn emit_sentinels(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner) {
        left_only(left_rows, joiner);
        right_only(right_rows, joiner);
    }
}

/// Matching pairs plus every unmatched left row.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftOuterJoin;

impl JoinOperation for LeftOuterJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::Left
    }

    fn group_size(&self, left: usize, right: usize) -> Option<usize> {
        if right == 0 {
            Some(left)
        } else {
            left.checked_mul(right)
        }
    }

    fn sentinel_size(&self, left: usize, _right: usize) -> usize {
        left
    }

    fn emit_group(&self, left_rows: &[usize], right_rows: &[usize], joiner: &mut Joiner) {
        if right_rows.is_empty() {
            left_only(left_rows, joiner);
        } else {
            cross_product(left_rows, right_rows, joiner);
        }
    }

    fn emit_sentinels(&self, left_rows: &[usize], _right_rows: &[usize], joiner: &mut Joiner) {
        left_only(left_rows, joiner);
    }
}
