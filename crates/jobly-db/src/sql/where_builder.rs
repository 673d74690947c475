//! WHERE predicate builder with a shared placeholder counter.

use super::ParamList;
use tokio_postgres::types::ToSql;

/// Accumulates `AND`-joined predicates.
///
/// Every predicate that takes a value consumes the next placeholder index, so
/// the indices in the finished clause are contiguous in emission order. Start
/// from [`WhereBuilder::with_offset`] when the clause is appended to a statement
/// that already binds parameters.
pub struct WhereBuilder {
    /// Predicates (without leading AND)
    conditions: Vec<String>,
    params: ParamList,
    /// Index of the last placeholder handed out
    param_count: usize,
}

impl WhereBuilder {
    /// Create a new WhereBuilder with param numbering starting at 1.
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Create a new WhereBuilder with param numbering starting after `offset`.
    ///
    /// For example, `with_offset(2)` means the first param will be `$3`.
    pub fn with_offset(offset: usize) -> Self {
        Self {
            conditions: Vec::new(),
            params: ParamList::new(),
            param_count: offset,
        }
    }

    /// Get current parameter count (including the offset).
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Check if any conditions have been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    // ==================== Basic Conditions ====================

    /// Push `sql_template` with its single `$` replaced by the next placeholder.
    fn add_condition<T>(&mut self, sql_template: &str, value: T)
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.param_count += 1;
        let placeholder = format!("${}", self.param_count);
        self.conditions
            .push(sql_template.replacen('$', &placeholder, 1));
        self.params.push(value);
    }

    /// Add AND equality condition.
    pub fn and_eq<T>(&mut self, col: &str, val: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.add_condition(&format!("{col} = $"), val);
        self
    }

    /// Add AND >= condition.
    pub fn and_gte<T>(&mut self, col: &str, val: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.add_condition(&format!("{col} >= $"), val);
        self
    }

    /// Add AND <= condition.
    pub fn and_lte<T>(&mut self, col: &str, val: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.add_condition(&format!("{col} <= $"), val);
        self
    }

    /// Add AND ILIKE condition (the value is used as the pattern).
    pub fn and_ilike<T>(&mut self, col: &str, val: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.add_condition(&format!("{col} ILIKE $"), val);
        self
    }

    /// Add a case-insensitive "contains" condition.
    ///
    /// The bound value is the raw text; the `%` wrapping happens in SQL.
    pub fn and_icontains(&mut self, col: &str, text: impl Into<String>) -> &mut Self {
        self.add_condition(&format!("{col} ILIKE '%' || $ || '%'"), text.into());
        self
    }

    // ==================== Option-friendly helpers ====================

    pub fn and_eq_opt<T>(&mut self, col: &str, val: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(v) = val {
            self.and_eq(col, v);
        }
        self
    }

    pub fn and_gte_opt<T>(&mut self, col: &str, val: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(v) = val {
            self.and_gte(col, v);
        }
        self
    }

    pub fn and_lte_opt<T>(&mut self, col: &str, val: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(v) = val {
            self.and_lte(col, v);
        }
        self
    }

    pub fn and_icontains_opt(&mut self, col: &str, text: Option<impl Into<String>>) -> &mut Self {
        if let Some(t) = text {
            self.and_icontains(col, t);
        }
        self
    }

    /// Finish the clause.
    pub fn build(self) -> WhereClause {
        WhereClause {
            clause: self.conditions.join(" AND "),
            params: self.params,
        }
    }
}

impl Default for WhereBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Predicate clause and its parameter values.
#[derive(Clone, Debug, Default)]
pub struct WhereClause {
    /// `a >= $1 AND b <= $2` (without the `WHERE` keyword); empty when nothing was added
    pub clause: String,
    /// Values in placeholder order
    pub params: ParamList,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// `" WHERE <clause>"`, or an empty string when there are no predicates.
    pub fn to_sql_suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }
}
