//! Row mapping traits

use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

use crate::error::{SegError, SegResult};

/// Map a result row into a Rust value.
///
/// ```ignore
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> SegResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> SegResult<Self>;
}

/// Extension methods on `Row` that report decode failures as [`SegError`].
pub trait RowExt {
    fn try_get_column<'a, T: FromSql<'a>>(&'a self, column: &str) -> SegResult<T>;
}

impl RowExt for Row {
    fn try_get_column<'a, T: FromSql<'a>>(&'a self, column: &str) -> SegResult<T> {
        self.try_get(column)
            .map_err(|e| SegError::decode(column, e.to_string()))
    }
}

macro_rules! impl_from_row_tuple {
    ($($ty:ident => $idx:tt),+) => {
        impl<$($ty),+> FromRow for ($($ty,)+)
        where
            $($ty: for<'a> FromSql<'a>),+
        {
            fn from_row(row: &Row) -> SegResult<Self> {
                Ok(($(
                    row.try_get($idx)
                        .map_err(|e| SegError::decode(stringify!($idx), e.to_string()))?,
                )+))
            }
        }
    };
}

impl_from_row_tuple!(A => 0);
impl_from_row_tuple!(A => 0, B => 1);
impl_from_row_tuple!(A => 0, B => 1, C => 2);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3);
