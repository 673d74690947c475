//! Companies: entity shape, filters and repository functions.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult, InvalidInput};
use crate::row::{FromRow, RowExt};
use crate::sql::{Changeset, ColumnAliases, WhereBuilder, WhereClause, partial_update};
use serde::{Deserialize, Deserializer, Serialize};

const ENTITY: &str = "company";

/// Columns returned by every company query, in entity field order.
const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Logical (API) field names to `companies` columns.
///
/// Only the fields a partial update may touch are accepted; `handle` is the key
/// and never changes.
pub const COMPANY_COLUMNS: ColumnAliases =
    ColumnAliases::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")])
        .restrict_to(&["name", "description", "numEmployees", "logoUrl"]);

/// A row of the `companies` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row<R: RowExt>(row: &R) -> DbResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update input; `None` fields are left untouched.
///
/// The nullable columns are tri-state: `None` skips the field, `Some(None)`
/// sets it to NULL. In JSON an explicit `null` means `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub num_employees: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo_url: Option<Option<String>>,
}

/// A field that is present deserializes to `Some`, even when its value is `null`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CompanyPatch {
    /// Supplied fields under their logical names, in declaration order.
    pub fn to_changeset(&self) -> Changeset {
        let mut changes = Changeset::new();
        changes
            .push_opt("name", self.name.clone())
            .push_opt("description", self.description.clone())
            .push_opt("numEmployees", self.num_employees)
            .push_opt("logoUrl", self.logo_url.clone());
        changes
    }
}

/// Optional criteria for [`Company::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    #[serde(default)]
    pub min_employees: Option<i32>,
    #[serde(default)]
    pub max_employees: Option<i32>,
    /// Case-insensitive substring of the company name.
    #[serde(default)]
    pub name: Option<String>,
}

impl CompanyFilter {
    /// Reject a minimum above the maximum.
    pub fn validate(&self) -> DbResult<()> {
        match (self.min_employees, self.max_employees) {
            (Some(min), Some(max)) if min > max => {
                Err(InvalidInput::EmployeeRange { min, max }.into())
            }
            _ => Ok(()),
        }
    }

    /// Predicate clause with placeholders starting at `$1`.
    pub fn build(&self) -> DbResult<WhereClause> {
        self.build_with_offset(0)
    }

    /// Predicate clause with placeholders starting at `$offset+1`.
    ///
    /// Predicates are emitted in a fixed order: minimum, maximum, name.
    pub fn build_with_offset(&self, offset: usize) -> DbResult<WhereClause> {
        self.validate()?;

        let num_employees = COMPANY_COLUMNS.resolve("numEmployees");
        let mut w = WhereBuilder::with_offset(offset);
        w.and_gte_opt(num_employees, self.min_employees)
            .and_lte_opt(num_employees, self.max_employees)
            .and_icontains_opt("name", self.name.as_deref());
        Ok(w.build())
    }
}

impl Company {
    /// Insert a company after checking that its handle is free.
    ///
    /// Fails with [`DbError::Conflict`] naming the handle if it is taken.
    pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> DbResult<Company> {
        let existing = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&new.handle],
            )
            .await?;
        if existing.is_some() {
            return Err(DbError::conflict(ENTITY, new.handle.as_str()));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = conn
            .query_opt(
                &sql,
                &[
                    &new.handle,
                    &new.name,
                    &new.description,
                    &new.num_employees,
                    &new.logo_url,
                ],
            )
            .await?
            .ok_or(DbError::NoRowReturned("INSERT INTO companies"))?;

        tracing::debug!(handle = %new.handle, "company created");
        Company::from_row(&row)
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> DbResult<Vec<Company>> {
        let predicate = filter.build()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies{} ORDER BY name",
            predicate.to_sql_suffix()
        );

        let rows = conn.query(&sql, &predicate.params.as_refs()).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// The company with `handle`, or [`DbError::NotFound`].
    pub async fn get(conn: &impl GenericClient, handle: &str) -> DbResult<Company> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let row = conn
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, handle))?;
        Company::from_row(&row)
    }

    /// Apply the supplied fields of `patch` and return the updated company.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: &CompanyPatch,
    ) -> DbResult<Company> {
        Self::update_fields(conn, handle, &patch.to_changeset()).await
    }

    /// Apply an ordered changeset of logical fields (see [`COMPANY_COLUMNS`]).
    ///
    /// The handle binds the placeholder after the last assignment.
    pub async fn update_fields(
        conn: &impl GenericClient,
        handle: &str,
        changes: &Changeset,
    ) -> DbResult<Company> {
        let set = partial_update(changes, &COMPANY_COLUMNS)?;
        let handle_idx = set.next_index();
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${handle_idx} RETURNING {COLUMNS}",
            set.clause
        );

        let mut params = set.params;
        params.push(handle.to_string());

        let row = conn
            .query_opt(&sql, &params.as_refs())
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, handle))?;

        tracing::debug!(handle, fields = changes.len(), "company updated");
        Company::from_row(&row)
    }

    /// Delete the company with `handle`; [`DbError::NotFound`] if there was none.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> DbResult<()> {
        conn.query_opt(
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
            &[&handle],
        )
        .await?
        .ok_or_else(|| DbError::not_found(ENTITY, handle))?;

        tracing::debug!(handle, "company removed");
        Ok(())
    }
}
