//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DatabaseConfig`].
///
/// Uses `NoTls`; `for_tests` selects the configured test database.
///
/// # Example
///
/// ```ignore
/// let config = jobly_db::DatabaseConfig::from_env()?;
/// let pool = jobly_db::create_pool(&config, false)?;
/// let client = pool.get().await?;
/// let companies = Company::find_all(&client, &CompanyFilter::default()).await?;
/// ```
pub fn create_pool(config: &DatabaseConfig, for_tests: bool) -> DbResult<Pool> {
    create_pool_from_url(config.effective_url(for_tests), config.pool_size)
}

/// Create a connection pool from a database URL.
pub fn create_pool_from_url(database_url: &str, max_size: usize) -> DbResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| DbError::Config(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);

    tracing::debug!(max_size, "creating connection pool");
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| DbError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_config_error() {
        let err = create_pool_from_url("not a url at all ===", 4).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[tokio::test]
    async fn pool_builds_without_connecting() {
        let pool = create_pool(&DatabaseConfig::new("postgres://localhost/jobly"), false).unwrap();
        assert_eq!(pool.status().max_size, 16);
    }
}
