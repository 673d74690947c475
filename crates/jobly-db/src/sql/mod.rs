//! Positional-parameter SQL fragment builders.
//!
//! Two builders live here:
//!
//! - [`partial_update`] turns an ordered [`Changeset`] into a `SET` assignment list
//!   (`"col"=$1, "other"=$2`) using a [`ColumnAliases`] table.
//! - [`WhereBuilder`] accumulates `AND`-joined predicates with a shared running
//!   placeholder counter.
//!
//! Values never appear in the SQL text; they are returned alongside it in a
//! [`ParamList`] in placeholder order.
//!
//! # Example
//! ```ignore
//! use jobly_db::sql::{partial_update, Changeset, ColumnAliases};
//!
//! const USERS: ColumnAliases = ColumnAliases::new(&[("firstName", "first_name")]);
//!
//! let set = partial_update(&Changeset::new().set("firstName", "Marty"), &USERS)?;
//! assert_eq!(set.clause, r#""first_name"=$1"#);
//! ```

mod partial_update;
mod where_builder;

pub use partial_update::{Changeset, SetClause, partial_update};
pub use where_builder::{WhereBuilder, WhereClause};

use crate::error::{DbResult, InvalidInput};
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter wrapper using Arc.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Ordered parameter values; element `i` binds placeholder `$i+1`.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.push_param(Param::new(value))
    }

    /// Add a pre-wrapped Param and return its 1-based index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_sql).collect()
    }
}

/// Logical field name to physical column name table.
///
/// Tables are code-defined constants. Names missing from the table map to
/// themselves. A table built with [`ColumnAliases::restrict_to`] additionally
/// refuses any logical name outside its allowed set, so caller-supplied keys can
/// never reach the SQL text unchecked.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAliases {
    aliases: &'static [(&'static str, &'static str)],
    allowed: Option<&'static [&'static str]>,
}

impl ColumnAliases {
    pub const fn new(aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            aliases,
            allowed: None,
        }
    }

    /// Only accept the listed logical names.
    pub const fn restrict_to(self, allowed: &'static [&'static str]) -> Self {
        Self {
            aliases: self.aliases,
            allowed: Some(allowed),
        }
    }

    /// Physical column for `logical`, or `logical` itself when it has no alias.
    pub fn resolve<'a>(&self, logical: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(from, _)| *from == logical)
            .map_or(logical, |&(_, to)| to)
    }

    /// Reject `logical` if this table is restricted and does not list it.
    pub fn check(&self, logical: &str) -> DbResult<()> {
        match self.allowed {
            Some(allowed) if !allowed.contains(&logical) => Err(InvalidInput::UnknownField {
                field: logical.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

/// Resolve a logical field name through `aliases`, defaulting to identity.
pub fn resolve_column<'a>(logical: &'a str, aliases: &ColumnAliases) -> &'a str {
    aliases.resolve(logical)
}

/// Render `name` as a quoted identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
