//! Row mapping traits

use crate::error::{DbError, DbResult};
use tokio_postgres::types::FromSql;

/// Column access on a row returned by a [`GenericClient`](crate::GenericClient).
pub trait RowExt {
    /// Get a column value by name, mapping failures to [`DbError::Decode`].
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for tokio_postgres::Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DbError::decode(column, e.to_string()))
    }
}

/// Trait for converting a database row into a Rust struct.
pub trait FromRow: Sized {
    fn from_row<R: RowExt>(row: &R) -> DbResult<Self>;
}
