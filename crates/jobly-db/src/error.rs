//! Error types for jobly-db

use std::fmt;
use thiserror::Error;

/// Result type alias for jobly-db operations
pub type DbResult<T> = Result<T, DbError>;

/// Caller mistakes that are caught before any SQL is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A partial update was requested with no fields.
    #[error("No data")]
    NoData,

    /// `minEmployees` was greater than `maxEmployees`.
    #[error("minEmployees ({min}) cannot be greater than maxEmployees ({max})")]
    EmployeeRange { min: i32, max: i32 },

    /// A logical field that the entity does not expose.
    #[error("Unknown field: {field}")]
    UnknownField { field: String },
}

/// Coarse error classification for the layer above the repository.
///
/// HTTP handlers and CLIs map this to status or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    NotFound,
    ExecutionFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidInput => "invalid input",
            Self::Conflict => "conflict",
            Self::NotFound => "not found",
            Self::ExecutionFailure => "execution failure",
        };
        f.write_str(s)
    }
}

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Rejected before reaching the database
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// Unique key already taken
    #[error("Duplicate {entity}: {key}")]
    Conflict { entity: &'static str, key: String },

    /// No row matched the key
    #[error("No {entity}: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Failure reported by the execution collaborator
    #[error("Query error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// A `RETURNING` statement succeeded but produced no row
    #[error("{0} returned no row")]
    NoRowReturned(&'static str),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool checkout error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for `entity` identified by `key`
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Create a duplicate-key error for `entity` identified by `key`
    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Execution(_)
            | Self::NoRowReturned(_)
            | Self::Decode { .. }
            | Self::Config(_) => ErrorKind::ExecutionFailure,
            #[cfg(feature = "pool")]
            Self::Pool(_) => ErrorKind::ExecutionFailure,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Postgres SQLSTATE of an execution failure, if the server reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Execution(err) => err.as_db_error().map(|db| db.code().code()),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
