//! # jobly-db
//!
//! Data access for Jobly: builders that turn update and filter objects into
//! positionally-parameterized SQL fragments, and the company repository built on
//! top of them.
//!
//! - **No interpolated values**: values always travel as `$n` parameters
//! - **Code-owned column names**: logical field names are checked against a static alias table
//! - **Fail before SQL**: empty updates and inverted ranges are rejected without touching the database
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ```ignore
//! use jobly_db::{Company, CompanyFilter, CompanyPatch};
//!
//! let filter = CompanyFilter { min_employees: Some(10), ..Default::default() };
//! let companies = Company::find_all(&client, &filter).await?;
//!
//! let patch = CompanyPatch { num_employees: Some(12), ..Default::default() };
//! let acme = Company::update(&client, "acme", &patch).await?;
//!
//! Company::remove(&client, "acme").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod row;
pub mod sql;

pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use error::{DbError, DbResult, ErrorKind, InvalidInput};
pub use models::{COMPANY_COLUMNS, Company, CompanyFilter, CompanyPatch, NewCompany};
pub use row::{FromRow, RowExt};
pub use sql::{
    Changeset, ColumnAliases, Param, ParamList, SetClause, WhereBuilder, WhereClause,
    partial_update, resolve_column,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_url};
