//! Key pooling and composite key encoding.
//!
//! Every distinct key value seen in a join call gets a dense integer code, in
//! first-seen order, scanning the left table before the right one. Keys over
//! several columns are folded into one composite code by positional radix
//! combination:
//!
//! ```text
//! composite = composite + subcode_i * base
//! base      = base * (k_i + 1)
//! ```
//!
//! where `k_i` is the number of distinct values of column `i`. Two rows share
//! a composite code iff they agree on every key column.

use std::sync::Arc;

use hashbrown::HashMap;

use fframe_error::{FrameError, Result};
use fframe_types::{Column, ColumnData, Value};

use crate::config::{JoinConfig, NaKeyPolicy};

/// Code of a row that never matches anything (NA key under
/// [`NaKeyPolicy::Distinct`]).
pub const SENTINEL_CODE: i64 = -1;

/// Composite radix bases up to this size are never compacted, whatever the
/// row count.
pub const MIN_KEY_SPACE: usize = 1 << 10;

/// Hashable form of a key value.
///
/// Values of different types never compare equal, so `1_i64` and `1.0_f64`
/// get different codes. Floats compare by bit pattern after folding `-0.0`
/// into `0.0` and every NaN into one canonical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyValue {
    Na,
    Bool(bool),
    Integer(i64),
    Float(u64),
    Text(Arc<str>),
}

impl KeyValue {
    fn extract(column: &Column, row: usize) -> Self {
        if column.is_na(row) {
            return Self::Na;
        }
        match column.data() {
            ColumnData::Bool(v) => Self::Bool(v[row]),
            ColumnData::Int64(v) => Self::Integer(v[row]),
            ColumnData::Float64(v) => Self::Float(canonical_bits(v[row])),
            ColumnData::Text(v) => Self::Text(Arc::clone(&v[row])),
            ColumnData::Mixed(v) => Self::from_value(&v[row]),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Na => Self::Na,
            Value::Bool(v) => Self::Bool(*v),
            Value::Int(v) => Self::Integer(*v),
            Value::Float(v) => Self::Float(canonical_bits(*v)),
            Value::Text(v) => Self::Text(Arc::clone(v)),
        }
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Per-call map from key values to dense codes.
#[derive(Debug)]
pub struct KeyPool {
    codes: HashMap<KeyValue, i64>,
    na_keys: NaKeyPolicy,
}

impl KeyPool {
    #[must_use]
    pub fn new(na_keys: NaKeyPolicy) -> Self {
        Self::with_capacity(na_keys, 0)
    }

    #[must_use]
    pub fn with_capacity(na_keys: NaKeyPolicy, capacity: usize) -> Self {
        Self {
            codes: HashMap::with_capacity(capacity),
            na_keys,
        }
    }

    /// Number of distinct codes handed out so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn code_for(&mut self, key: KeyValue) -> i64 {
        if key == KeyValue::Na && self.na_keys == NaKeyPolicy::Distinct {
            return SENTINEL_CODE;
        }
        let next = self.codes.len() as i64;
        *self.codes.entry(key).or_insert(next)
    }

    /// Encode every row of `column`, assigning new codes to unseen values.
    pub fn encode_column(&mut self, column: &Column) -> Vec<i64> {
        (0..column.len())
            .map(|row| self.code_for(KeyValue::extract(column, row)))
            .collect()
    }

    /// Encode loose values, assigning new codes to unseen values.
    pub fn encode_values(&mut self, values: &[Value]) -> Vec<i64> {
        values
            .iter()
            .map(|value| self.code_for(KeyValue::from_value(value)))
            .collect()
    }
}

/// Group codes for both sides of one join call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKeys {
    left: Vec<i64>,
    right: Vec<i64>,
    max_groups: usize,
    compactions: usize,
}

impl JoinKeys {
    /// Assemble keys from precomputed codes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Internal`] if a code is outside
    /// `-1..max_groups`.
    pub fn from_codes(left: Vec<i64>, right: Vec<i64>, max_groups: usize) -> Result<Self> {
        if let Some(&bad) = left
            .iter()
            .chain(right.iter())
            .find(|&&code| code < SENTINEL_CODE || code >= max_groups as i64)
        {
            return Err(FrameError::internal(format!(
                "group code {bad} outside 0..{max_groups}"
            )));
        }
        Ok(Self {
            left,
            right,
            max_groups,
            compactions: 0,
        })
    }

    /// Single-column keys: one shared pool, left column scanned first.
    #[must_use]
    pub fn from_columns(left: &Column, right: &Column, na_keys: NaKeyPolicy) -> Self {
        let mut pool = KeyPool::with_capacity(na_keys, left.len().max(right.len()));
        let left = pool.encode_column(left);
        let right = pool.encode_column(right);
        Self {
            left,
            right,
            max_groups: pool.len(),
            compactions: 0,
        }
    }

    /// Keys over loose values, e.g. row labels.
    #[must_use]
    pub fn from_values(left: &[Value], right: &[Value], na_keys: NaKeyPolicy) -> Self {
        let mut pool = KeyPool::with_capacity(na_keys, left.len().max(right.len()));
        let left = pool.encode_values(left);
        let right = pool.encode_values(right);
        Self {
            left,
            right,
            max_groups: pool.len(),
            compactions: 0,
        }
    }

    #[must_use]
    pub fn left_codes(&self) -> &[i64] {
        &self.left
    }

    #[must_use]
    pub fn right_codes(&self) -> &[i64] {
        &self.right
    }

    /// Exclusive upper bound of the group codes.
    #[must_use]
    pub const fn max_groups(&self) -> usize {
        self.max_groups
    }

    /// How many times composite codes were compacted while encoding.
    #[must_use]
    pub const fn key_compactions(&self) -> usize {
        self.compactions
    }
}

/// One join key: the same-named column in each table.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumn<'a> {
    pub name: &'a str,
    pub left: &'a Column,
    pub right: &'a Column,
}

impl<'a> KeyColumn<'a> {
    #[must_use]
    pub const fn new(name: &'a str, left: &'a Column, right: &'a Column) -> Self {
        Self { name, left, right }
    }

    /// The same key with the two sides exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            name: self.name,
            left: self.right,
            right: self.left,
        }
    }

    fn check_shape(&self, left_rows: usize, right_rows: usize) -> Result<()> {
        for (column, rows) in [(self.left, left_rows), (self.right, right_rows)] {
            if column.len() != rows {
                return Err(FrameError::ShapeMismatch {
                    column: self.name.to_owned(),
                    len: column.len(),
                    rows,
                });
            }
        }
        Ok(())
    }
}

/// Turns key columns into [`JoinKeys`].
#[derive(Debug, Clone, Copy)]
pub struct KeyEncoder {
    na_keys: NaKeyPolicy,
    max_key_space: usize,
}

impl Default for KeyEncoder {
    fn default() -> Self {
        Self::new(&JoinConfig::default())
    }
}

impl KeyEncoder {
    #[must_use]
    pub const fn new(config: &JoinConfig) -> Self {
        Self {
            na_keys: config.na_keys,
            max_key_space: config.max_key_space,
        }
    }

    /// Encode one or more key columns.
    ///
    /// A single column is pooled directly (`max_groups` = number of distinct
    /// values). Several columns are folded into composite codes; whenever the
    /// radix base would exceed the key-space limit the partial codes are
    /// renumbered by rank, which keeps the relative order of every group.
    /// The limit is also capped at the combined row count (but never below
    /// [`MIN_KEY_SPACE`]), so `max_groups` stays proportional to the input.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptyJoinKeys`] for an empty key list and
    /// [`FrameError::ShapeMismatch`] when a key column's length differs from
    /// its table's row count.
    pub fn encode(
        &self,
        keys: &[KeyColumn<'_>],
        left_rows: usize,
        right_rows: usize,
    ) -> Result<JoinKeys> {
        let Some((first, rest)) = keys.split_first() else {
            return Err(FrameError::EmptyJoinKeys);
        };
        first.check_shape(left_rows, right_rows)?;
        if rest.is_empty() {
            return Ok(JoinKeys::from_columns(first.left, first.right, self.na_keys));
        }

        let limit = self
            .max_key_space
            .min(left_rows.saturating_add(right_rows).max(MIN_KEY_SPACE));
        let mut left = vec![0_i64; left_rows];
        let mut right = vec![0_i64; right_rows];
        let mut base: usize = 1;
        let mut compactions = 0;
        for key in keys {
            key.check_shape(left_rows, right_rows)?;
            let sub = JoinKeys::from_columns(key.left, key.right, self.na_keys);
            let radix = sub.max_groups + 1;

            if base > 1
                && base
                    .checked_mul(radix)
                    .is_none_or(|next| next > limit)
            {
                base = compact_codes(&mut left, &mut right);
                compactions += 1;
            }

            let next_base = base
                .checked_mul(radix)
                .filter(|&next| i64::try_from(next).is_ok())
                .ok_or_else(|| {
                    FrameError::internal(format!(
                        "composite key space overflow at column {}",
                        key.name
                    ))
                })?;
            let step = base as i64;
            fold_codes(&mut left, &sub.left, step);
            fold_codes(&mut right, &sub.right, step);
            base = next_base;

            if base > limit {
                base = compact_codes(&mut left, &mut right);
                compactions += 1;
            }
        }

        tracing::trace!(
            key_columns = keys.len(),
            max_groups = base,
            compactions,
            "composite keys encoded"
        );

        Ok(JoinKeys {
            left,
            right,
            max_groups: base,
            compactions,
        })
    }
}

fn fold_codes(composite: &mut [i64], sub: &[i64], step: i64) {
    for (code, &subcode) in composite.iter_mut().zip(sub) {
        if *code == SENTINEL_CODE || subcode == SENTINEL_CODE {
            *code = SENTINEL_CODE;
        } else {
            *code += subcode * step;
        }
    }
}

/// Renumber non-sentinel codes by rank across both sides and return the
/// number of distinct codes. Rank order equals code order, so groups keep
/// their relative position.
fn compact_codes(left: &mut [i64], right: &mut [i64]) -> usize {
    let mut distinct: Vec<i64> = left
        .iter()
        .chain(right.iter())
        .copied()
        .filter(|&code| code != SENTINEL_CODE)
        .collect();
    distinct.sort_unstable();
    distinct.dedup();
    for code in left.iter_mut().chain(right.iter_mut()) {
        if *code == SENTINEL_CODE {
            continue;
        }
        if let Ok(rank) = distinct.binary_search(code) {
            *code = rank as i64;
        }
    }
    distinct.len()
}
