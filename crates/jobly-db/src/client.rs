//! Execution seam between the repository and the database.

use crate::error::{DbError, DbResult};
use crate::row::RowExt;
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Longest statement prefix written to the log.
const MAX_LOGGED_SQL: usize = 200;

/// A trait that unifies database clients and transactions.
///
/// Repository functions accept `&impl GenericClient`, so the same call works on a
/// plain connection, a pooled connection or an open transaction. The client owns
/// pooling, timeouts and cancellation; callers only hand over statement text and
/// positional parameters.
pub trait GenericClient: Send + Sync {
    /// Row type produced by this client.
    type Row: RowExt + Send;

    /// Execute a statement and return all rows.
    ///
    /// Connectivity and constraint failures are returned as errors, never as
    /// an empty result.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<Vec<Self::Row>>> + Send;

    /// Execute a statement and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<Option<Self::Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }
}

fn truncate_sql(sql: &str) -> &str {
    if sql.len() <= MAX_LOGGED_SQL {
        return sql;
    }
    let mut end = MAX_LOGGED_SQL;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn log_statement(sql: &str, param_count: usize) {
    tracing::debug!(
        target: "jobly_db::sql",
        sql = truncate_sql(sql),
        params = param_count,
        "executing statement"
    );
}

fn execution_failed(sql: &str, err: tokio_postgres::Error) -> DbError {
    tracing::warn!(
        target: "jobly_db::sql",
        sql = truncate_sql(sql),
        error = %err,
        "statement failed"
    );
    DbError::Execution(err)
}

impl GenericClient for tokio_postgres::Client {
    type Row = Row;

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        log_statement(sql, params.len());
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(|e| execution_failed(sql, e))
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    type Row = Row;

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        log_statement(sql, params.len());
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(|e| execution_failed(sql, e))
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    type Row = Row;

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper -> tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        GenericClient::query(client, sql, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sql_is_logged_whole() {
        assert_eq!(truncate_sql("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn long_sql_is_cut_on_a_char_boundary() {
        let sql = format!("SELECT '{}'", "é".repeat(200));
        let cut = truncate_sql(&sql);
        assert!(cut.len() <= MAX_LOGGED_SQL);
        assert!(sql.starts_with(cut));
    }
}
