//! Equi-join engine.
//!
//! A join call runs in four phases, each scoped to the call:
//!
//! 1. **encode**: key values are pooled into dense group codes shared by both
//!    tables ([`keys`]); multi-column keys fold into one composite code.
//! 2. **group_sort**: each side is counting-sorted by code ([`group_sort`]).
//! 3. **strategy**: an [`InnerJoin`], [`OuterJoin`] or [`LeftOuterJoin`]
//!    walks the groups in code order and emits row-index pairs into a
//!    [`Joiner`]. Right joins run as left joins with the operands exchanged.
//! 4. **materialize**: the [`Joiner`] gathers the output table.
//!
//! No state survives a call, so independent calls never interfere.

pub mod config;
pub mod group_sort;
pub mod joiner;
pub mod keys;
pub mod stats;
pub mod strategy;

use smallvec::SmallVec;
use tracing::{debug, debug_span, warn};

use fframe_error::{FrameError, Result};
use fframe_types::{Column, Table};

pub use config::{DEFAULT_MAX_KEY_SPACE, DEFAULT_RIGHT_SUFFIX, JoinConfig, NaKeyPolicy};
pub use group_sort::{GroupSortResult, group_sort_index};
pub use joiner::{Joiner, NO_ROW};
pub use keys::{JoinKeys, KeyColumn, KeyEncoder, KeyPool, MIN_KEY_SPACE, SENTINEL_CODE};
pub use stats::JoinStats;
pub use strategy::{InnerJoin, JoinKind, JoinOperation, LeftOuterJoin, OuterJoin};

/// Key name used in logs and errors for record-index joins.
const RECORD_INDEX_KEY: &str = "<record index>";

type KeyColumns<'a> = SmallVec<[KeyColumn<'a>; 4]>;

/// Join `left` and `right` on the named key columns with default settings.
///
/// # Errors
///
/// See [`join_with_config`].
pub fn join(left: &Table, right: &Table, keys: &[&str], kind: JoinKind) -> Result<Table> {
    join_with_config(left, right, keys, kind, &JoinConfig::default())
}

/// Join `left` and `right` on the named key columns.
///
/// Output columns are the keys, then the non-key columns of `left`, then the
/// non-key columns of `right` (renamed on collision, see [`Joiner::join`]).
///
/// # Errors
///
/// Configuration errors ([`FrameError::InvalidConfig`],
/// [`FrameError::EmptyJoinKeys`], [`FrameError::ColumnNotFound`]) are raised
/// before any data is read. A key column whose length differs from its
/// table's row count raises [`FrameError::ShapeMismatch`].
pub fn join_with_config(
    left: &Table,
    right: &Table,
    keys: &[&str],
    kind: JoinKind,
    config: &JoinConfig,
) -> Result<Table> {
    let _span = debug_span!(
        "join",
        %kind,
        left_rows = left.rows(),
        right_rows = right.rows(),
        keys = keys.len()
    )
    .entered();
    let (joiner, _stats) = plan_join(left, right, keys, kind, config)?;
    joiner.join(left, right, keys, config)
}

/// Compute the row-index pairs of a join without materializing it.
///
/// # Errors
///
/// Same conditions as [`join_with_config`].
pub fn plan_join(
    left: &Table,
    right: &Table,
    keys: &[&str],
    kind: JoinKind,
    config: &JoinConfig,
) -> Result<(Joiner, JoinStats)> {
    validate_config(config)?;
    let columns = resolve_keys(left, right, keys)?;
    plan_columns(&columns, left.rows(), right.rows(), kind, config)
}

/// Names of the columns present in both tables, in `left` column order.
#[must_use]
pub fn natural_keys<'a>(left: &'a Table, right: &Table) -> Vec<&'a str> {
    left.column_names()
        .filter(|name| right.column_index().contains(name))
        .collect()
}

/// Join on every column the two tables share.
///
/// # Errors
///
/// Returns [`FrameError::EmptyJoinKeys`] when the tables share no column;
/// otherwise as [`join_with_config`].
pub fn natural_join(left: &Table, right: &Table, kind: JoinKind) -> Result<Table> {
    natural_join_with_config(left, right, kind, &JoinConfig::default())
}

pub fn natural_join_with_config(
    left: &Table,
    right: &Table,
    kind: JoinKind,
    config: &JoinConfig,
) -> Result<Table> {
    let keys = natural_keys(left, right);
    debug!(keys = ?keys, "natural join keys");
    join_with_config(left, right, &keys, kind, config)
}

/// Join on the record indices (row labels) of the two tables.
///
/// The output carries no key columns: all columns of `left`, then all
/// columns of `right` (renamed on collision), with a fresh default index.
///
/// # Errors
///
/// Returns [`FrameError::InvalidConfig`] for an unusable configuration.
pub fn join_on_index(left: &Table, right: &Table, kind: JoinKind) -> Result<Table> {
    join_on_index_with_config(left, right, kind, &JoinConfig::default())
}

pub fn join_on_index_with_config(
    left: &Table,
    right: &Table,
    kind: JoinKind,
    config: &JoinConfig,
) -> Result<Table> {
    let _span = debug_span!(
        "join",
        %kind,
        left_rows = left.rows(),
        right_rows = right.rows(),
        keys = RECORD_INDEX_KEY
    )
    .entered();
    validate_config(config)?;
    let left_labels = left.record_labels();
    let right_labels = right.record_labels();
    let columns = [KeyColumn::new(RECORD_INDEX_KEY, &left_labels, &right_labels)];
    let (joiner, _stats) = plan_columns(&columns, left.rows(), right.rows(), kind, config)?;
    joiner.join(left, right, &[], config)
}

fn validate_config(config: &JoinConfig) -> Result<()> {
    config.validate().inspect_err(|err| {
        warn!(error = %err, "rejected join configuration");
    })
}

fn resolve_keys<'a>(left: &'a Table, right: &'a Table, keys: &[&'a str]) -> Result<KeyColumns<'a>> {
    if keys.is_empty() {
        warn!("join requested without key columns");
        return Err(FrameError::EmptyJoinKeys);
    }
    if let Some((_, &name)) = keys
        .iter()
        .enumerate()
        .find(|&(i, name)| keys[..i].contains(name))
    {
        warn!(column = name, "join key listed more than once");
        return Err(FrameError::DuplicateJoinKey(name.to_owned()));
    }
    keys.iter()
        .map(|&name| {
            let left_column = lookup(left, name, "left")?;
            let right_column = lookup(right, name, "right")?;
            Ok(KeyColumn::new(name, left_column, right_column))
        })
        .collect()
}

fn lookup<'a>(table: &'a Table, name: &str, side: &'static str) -> Result<&'a Column> {
    table.get(name).ok_or_else(|| {
        warn!(column = name, side, "join key column not found");
        FrameError::column_not_found(name, side)
    })
}

fn plan_columns(
    columns: &[KeyColumn<'_>],
    left_rows: usize,
    right_rows: usize,
    kind: JoinKind,
    config: &JoinConfig,
) -> Result<(Joiner, JoinStats)> {
    let Some(operation) = kind.operation() else {
        let swapped: KeyColumns<'_> = columns.iter().map(|key| key.swapped()).collect();
        let (mut joiner, stats) = plan_columns(&swapped, right_rows, left_rows, JoinKind::Left, config)?;
        joiner.swap();
        return Ok((joiner, stats.swapped()));
    };

    let keys = KeyEncoder::new(config).encode(columns, left_rows, right_rows)?;
    debug!(
        phase = "encode",
        max_groups = keys.max_groups(),
        compactions = keys.key_compactions(),
        "join keys encoded"
    );

    let left_groups = group_sort_index(keys.left_codes(), keys.max_groups())?;
    let right_groups = group_sort_index(keys.right_codes(), keys.max_groups())?;
    debug!(
        phase = "group_sort",
        left_sentinels = left_groups.sentinel_count(),
        right_sentinels = right_groups.sentinel_count(),
        "sides grouped"
    );

    let joiner = operation.create_joiner_from_groups(&left_groups, &right_groups)?;
    let stats = JoinStats::from_groups(&left_groups, &right_groups)
        .with_output_rows(joiner.len())
        .with_key_compactions(keys.key_compactions());
    debug!(
        phase = "strategy",
        strategy = %operation.kind(),
        output_rows = stats.output_rows,
        matched_groups = stats.matched_groups,
        unmatched_left = stats.unmatched_left,
        unmatched_right = stats.unmatched_right,
        "pairs enumerated"
    );
    Ok((joiner, stats))
}
