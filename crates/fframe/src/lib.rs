//! frankenframe: columnar tables with counting-sort equi-joins.
//!
//! ```ignore
//! use fframe::{Join, Table};
//!
//! let out = Join::left_outer(&orders, &customers).on(&["customer_id"])?;
//! ```
//!
//! [`Join`] is the fluent entry point; [`TableJoinExt`] adds the same
//! operations as methods on [`Table`]. The engine itself lives in
//! [`fframe_join`].

pub mod logging;

pub use fframe_error::{FrameError, Result};
pub use fframe_join::{
    JoinConfig, JoinKind, JoinStats, Joiner, NO_ROW, NaKeyPolicy, natural_keys,
};
pub use fframe_types::{
    Column, ColumnBuilder, ColumnData, ColumnIndex, ColumnType, NullBitmap, Table, TableBuilder,
    Value,
};

/// A pending join of two tables.
#[derive(Debug, Clone)]
pub struct Join<'a> {
    left: &'a Table,
    right: &'a Table,
    kind: JoinKind,
    config: JoinConfig,
}

impl<'a> Join<'a> {
    #[must_use]
    pub fn new(left: &'a Table, right: &'a Table, kind: JoinKind) -> Self {
        Self {
            left,
            right,
            kind,
            config: JoinConfig::default(),
        }
    }

    #[must_use]
    pub fn inner(left: &'a Table, right: &'a Table) -> Self {
        Self::new(left, right, JoinKind::Inner)
    }

    #[must_use]
    pub fn outer(left: &'a Table, right: &'a Table) -> Self {
        Self::new(left, right, JoinKind::Outer)
    }

    #[must_use]
    pub fn left_outer(left: &'a Table, right: &'a Table) -> Self {
        Self::new(left, right, JoinKind::Left)
    }

    #[must_use]
    pub fn right_outer(left: &'a Table, right: &'a Table) -> Self {
        Self::new(left, right, JoinKind::Right)
    }

    #[must_use]
    pub fn with_config(mut self, config: JoinConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> JoinKind {
        self.kind
    }

    #[must_use]
    pub const fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Join on the named key columns.
    pub fn on(&self, keys: &[&str]) -> Result<Table> {
        fframe_join::join_with_config(self.left, self.right, keys, self.kind, &self.config)
    }

    /// Row-index pairs and statistics without building the output table.
    pub fn plan(&self, keys: &[&str]) -> Result<(Joiner, JoinStats)> {
        fframe_join::plan_join(self.left, self.right, keys, self.kind, &self.config)
    }

    /// Join on every column both tables share.
    pub fn natural(&self) -> Result<Table> {
        fframe_join::natural_join_with_config(self.left, self.right, self.kind, &self.config)
    }

    /// Join on the record indices.
    pub fn on_index(&self) -> Result<Table> {
        fframe_join::join_on_index_with_config(self.left, self.right, self.kind, &self.config)
    }
}

/// Join operations as [`Table`] methods.
pub trait TableJoinExt {
    fn join(&self, kind: JoinKind, other: &Table, keys: &[&str]) -> Result<Table>;

    fn natural_join(&self, kind: JoinKind, other: &Table) -> Result<Table>;

    fn join_on_index(&self, kind: JoinKind, other: &Table) -> Result<Table>;
}

impl TableJoinExt for Table {
    fn join(&self, kind: JoinKind, other: &Table, keys: &[&str]) -> Result<Table> {
        Join::new(self, other, kind).on(keys)
    }

    fn natural_join(&self, kind: JoinKind, other: &Table) -> Result<Table> {
        Join::new(self, other, kind).natural()
    }

    fn join_on_index(&self, kind: JoinKind, other: &Table) -> Result<Table> {
        Join::new(self, other, kind).on_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new(
            ["customer", "amount"],
            vec![
                Column::from_strs(["ann", "bob", "ann", "cid"]),
                Column::from_i64s([10, 20, 30, 40]),
            ],
        )
        .unwrap()
    }

    fn customers() -> Table {
        Table::new(
            ["customer", "city"],
            vec![
                Column::from_strs(["ann", "bob", "dee"]),
                Column::from_strs(["oslo", "rome", "lima"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builder_and_extension_agree() {
        let (o, c) = (orders(), customers());
        for kind in JoinKind::ALL {
            let fluent = Join::new(&o, &c, kind).on(&["customer"]).unwrap();
            let method = o.join(kind, &c, &["customer"]).unwrap();
            assert_eq!(fluent, method, "case=builder_vs_ext kind={kind}");
        }
    }

    #[test]
    fn named_constructors_pick_kind() {
        let (o, c) = (orders(), customers());
        assert_eq!(Join::inner(&o, &c).kind(), JoinKind::Inner);
        assert_eq!(Join::outer(&o, &c).kind(), JoinKind::Outer);
        assert_eq!(Join::left_outer(&o, &c).kind(), JoinKind::Left);
        assert_eq!(Join::right_outer(&o, &c).kind(), JoinKind::Right);

        assert_eq!(Join::inner(&o, &c).on(&["customer"]).unwrap().rows(), 3);
        assert_eq!(Join::left_outer(&o, &c).on(&["customer"]).unwrap().rows(), 4);
        assert_eq!(Join::right_outer(&o, &c).on(&["customer"]).unwrap().rows(), 4);
        assert_eq!(Join::outer(&o, &c).on(&["customer"]).unwrap().rows(), 5);
    }

    #[test]
    fn natural_and_index_variants() {
        let (o, c) = (orders(), customers());
        assert_eq!(
            o.natural_join(JoinKind::Inner, &c).unwrap(),
            o.join(JoinKind::Inner, &c, &["customer"]).unwrap()
        );
        let by_index = o.join_on_index(JoinKind::Inner, &c).unwrap();
        assert_eq!(by_index.rows(), 3);
        assert_eq!(by_index.column_names().collect::<Vec<_>>(), vec![
            "customer",
            "amount",
            "customer (right)",
            "city"
        ]);
    }

    #[test]
    fn config_flows_through() {
        let (o, c) = (orders(), customers());
        let join = Join::inner(&o, &c).with_config(JoinConfig::default().with_right_suffix("_c"));
        assert_eq!(join.config().right_suffix, "_c");
        let out = join.on_index().unwrap();
        assert!(out.get("customer_c").is_some());

        let (joiner, stats) = join.plan(&["customer"]).unwrap();
        assert_eq!(stats.output_rows, joiner.len());
        assert_eq!(stats.unmatched_left, 1);
        assert_eq!(stats.unmatched_right, 1);
    }
}
