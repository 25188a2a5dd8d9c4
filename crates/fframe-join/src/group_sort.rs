//! Counting sort over group codes.
//!
//! Produces a stable permutation of row positions in which all rows of one
//! group code are contiguous, in ascending code order, plus per-group counts.
//! Bucket 0 is reserved for the sentinel code `-1`; group `g` lives in
//! bucket `g + 1`. Runs in `O(n + max_groups)`.

use fframe_error::{FrameError, Result};

use crate::keys::SENTINEL_CODE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSortResult {
    order: Vec<usize>,
    counts: Vec<usize>,
}

impl GroupSortResult {
    /// Row positions grouped by code. Sentinel rows come first.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Bucket counts: `counts[0]` for sentinel rows, `counts[g + 1]` for
    /// group `g`.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of rows carrying the sentinel code.
    #[must_use]
    pub fn sentinel_count(&self) -> usize {
        self.counts[0]
    }

    /// Number of rows in group `group` (zero past the last group).
    #[must_use]
    pub fn group_count(&self, group: usize) -> usize {
        self.counts.get(group + 1).copied().unwrap_or(0)
    }

    /// Number of group buckets, excluding the sentinel bucket.
    #[must_use]
    pub fn max_groups(&self) -> usize {
        self.counts.len() - 1
    }

    /// Number of rows sorted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sort row positions by group code.
///
/// # Errors
///
/// Returns [`FrameError::Internal`] if a code lies outside
/// `-1..max_groups`.
pub fn group_sort_index(codes: &[i64], max_groups: usize) -> Result<GroupSortResult> {
    let mut counts = vec![0_usize; max_groups + 1];
    for &code in codes {
        let bucket = bucket_of(code, max_groups)?;
        counts[bucket] += 1;
    }

    let mut next = Vec::with_capacity(counts.len());
    let mut offset = 0;
    for &count in &counts {
        next.push(offset);
        offset += count;
    }

    let mut order = vec![0_usize; codes.len()];
    for (row, &code) in codes.iter().enumerate() {
        // Range already checked by the histogram pass.
        let bucket = (code + 1) as usize;
        order[next[bucket]] = row;
        next[bucket] += 1;
    }

    Ok(GroupSortResult { order, counts })
}

fn bucket_of(code: i64, max_groups: usize) -> Result<usize> {
    if code < SENTINEL_CODE || code >= max_groups as i64 {
        return Err(FrameError::internal(format!(
            "group code {code} outside 0..{max_groups}"
        )));
    }
    Ok((code + 1) as usize)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn groups_are_contiguous_and_stable() {
        let sorted = group_sort_index(&[2, 0, 2, 1, 0], 3).unwrap();
        assert_eq!(sorted.order(), &[1, 4, 3, 0, 2]);
        assert_eq!(sorted.counts(), &[0, 2, 1, 2]);
        assert_eq!(sorted.group_count(2), 2);
        assert_eq!(sorted.group_count(7), 0);
        assert_eq!(sorted.max_groups(), 3);
    }

    #[test]
    fn sentinel_rows_fill_bucket_zero() {
        let sorted = group_sort_index(&[0, -1, 0, -1], 1).unwrap();
        assert_eq!(sorted.sentinel_count(), 2);
        assert_eq!(sorted.order(), &[1, 3, 0, 2]);
    }

    #[test]
    fn empty_input() {
        let sorted = group_sort_index(&[], 0).unwrap();
        assert!(sorted.is_empty());
        assert_eq!(sorted.counts(), &[0]);
    }

    #[test]
    fn out_of_range_codes_rejected() {
        assert!(group_sort_index(&[3], 3).is_err());
        assert!(group_sort_index(&[-2], 3).is_err());
    }

    proptest! {
        #[test]
        fn prop_counting_sort_invariants(
            codes in proptest::collection::vec(-1_i64..8, 0..64),
        ) {
            let sorted = group_sort_index(&codes, 8).unwrap();
            prop_assert_eq!(sorted.counts().iter().sum::<usize>(), codes.len());

            let mut seen = sorted.order().to_vec();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..codes.len()).collect::<Vec<_>>());

            // Codes along the order are non-decreasing, rows within a run ascend.
            for pair in sorted.order().windows(2) {
                let (a, b) = (codes[pair[0]], codes[pair[1]]);
                prop_assert!(a < b || (a == b && pair[0] < pair[1]));
            }
        }
    }
}
