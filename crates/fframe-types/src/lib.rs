//! Columnar table model for frankenframe.
//!
//! A [`Table`] is an ordered set of named [`Column`]s of equal length. Columns
//! are typed ([`ColumnType`]) and carry a [`NullBitmap`] marking NA slots.
//! Tables are immutable once built; [`TableBuilder`] and [`ColumnBuilder`]
//! fill new tables cell by cell.

pub mod bitmap;
pub mod column;
pub mod index;
pub mod table;
pub mod value;

pub use bitmap::NullBitmap;
pub use column::{Column, ColumnBuilder, ColumnData};
pub use index::{ColumnIndex, ColumnIndexBuilder};
pub use table::{Table, TableBuilder};
pub use value::{ColumnType, Value};
