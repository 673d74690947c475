use super::{ColumnAliases, Param, ParamList, quote_ident, resolve_column};
use crate::error::{DbResult, InvalidInput};
use tokio_postgres::types::ToSql;

/// Ordered set of field changes for a partial update.
///
/// Insertion order is the placeholder order: the first field set binds `$1`.
/// Setting a field that is already present replaces its value and keeps its
/// original position.
#[derive(Clone, Debug, Default)]
pub struct Changeset {
    fields: Vec<(String, Param)>,
}

impl Changeset {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a field (builder form).
    pub fn set<T>(mut self, field: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.push(field, value);
        self
    }

    /// Set a field in place.
    pub fn push<T>(&mut self, field: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.push_param(field.into(), Param::new(value))
    }

    /// Set an optional field (None => skip).
    pub fn push_opt<T>(&mut self, field: &str, value: Option<T>) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        if let Some(v) = value {
            self.push(field, v);
        }
        self
    }

    /// Set a field from an already wrapped parameter.
    pub fn push_param(&mut self, field: String, value: Param) -> &mut Self {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Logical field names in placeholder order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// `SET` assignment list and its parameter values.
#[derive(Clone, Debug)]
pub struct SetClause {
    /// `"col_a"=$1, "col_b"=$2` (without the `SET` keyword)
    pub clause: String,
    /// Values in placeholder order
    pub params: ParamList,
}

impl SetClause {
    /// Placeholder index for the first parameter appended after the assignments.
    pub fn next_index(&self) -> usize {
        self.params.len() + 1
    }
}

/// Build the assignment list for a partial update.
///
/// Fails with [`InvalidInput::NoData`] when `changes` is empty, and with
/// [`InvalidInput::UnknownField`] when a restricted `aliases` table does not
/// list one of the fields. Nothing is built in either case.
pub fn partial_update(changes: &Changeset, aliases: &ColumnAliases) -> DbResult<SetClause> {
    if changes.is_empty() {
        return Err(InvalidInput::NoData.into());
    }
    for field in changes.fields() {
        aliases.check(field)?;
    }

    let mut params = ParamList::new();
    let mut parts = Vec::with_capacity(changes.len());
    for (field, value) in &changes.fields {
        let idx = params.push_param(value.clone());
        let column = quote_ident(resolve_column(field, aliases));
        parts.push(format!("{column}=${idx}"));
    }

    Ok(SetClause {
        clause: parts.join(", "),
        params,
    })
}
