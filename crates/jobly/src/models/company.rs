//! Companies: lookup, search and writes keyed by `handle`.

use crate::client::GenericClient;
use crate::config::messages;
use crate::error::{JoblyError, JoblyResult};
use crate::qb::{FieldMap, Filter, FilterCriteria, MatchPattern, Table};
use crate::row::{FromRow, RowExt};
use crate::validate::Checks;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Company search: `search` matches anywhere in the handle or name.
pub const COMPANY_FILTERS: &[Filter] = &[
    Filter::search("search", &["handle", "name"], MatchPattern::Substring),
    Filter::min("min_employees", "num_employees"),
    Filter::max("max_employees", "num_employees"),
];

pub const COMPANIES: Table = Table::new(
    "companies",
    &["handle", "name", "num_employees", "description", "logo_url"],
)
.with_key("handle")
.with_writable_cols(&["handle", "name", "num_employees", "description", "logo_url"])
.with_listing_cols(&["handle", "name"])
.with_order_by("name")
.with_filters(COMPANY_FILTERS);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            num_employees: row.try_get_column("num_employees")?,
            description: row.try_get_column("description")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
}

impl FromRow for CompanySummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> JoblyResult<()> {
        Checks::new()
            .non_empty("handle", &self.handle)
            .non_empty("name", &self.name)
            .range(
                "num_employees",
                self.num_employees.map(f64::from),
                0.0,
                f64::from(i32::MAX),
            )
            .url("logo_url", self.logo_url.as_deref())
            .finish()
    }

    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("handle", self.handle.as_str())
            .with("name", self.name.as_str())
            .with("num_employees", self.num_employees)
            .with("description", self.description.clone())
            .with("logo_url", self.logo_url.clone())
    }
}

/// `GET /companies` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanySearch {
    pub search: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl CompanySearch {
    /// Bounds must not contradict each other.
    pub fn validate(&self) -> JoblyResult<()> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(JoblyError::validation(messages::COMPANY_MIN_MAX_EMPLOYEES));
            }
        }
        Ok(())
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with("search", self.search.clone())
            .with("min_employees", self.min_employees)
            .with("max_employees", self.max_employees)
    }
}

fn not_found(handle: &str) -> String {
    format!("{}{handle}", messages::COMPANY_NOT_FOUND)
}

impl Company {
    /// All companies as `{handle, name}`, ordered by name.
    pub async fn all(conn: &impl GenericClient) -> JoblyResult<Vec<CompanySummary>> {
        COMPANIES.all().fetch_all_as(conn).await
    }

    pub async fn search(
        conn: &impl GenericClient,
        search: &CompanySearch,
    ) -> JoblyResult<Vec<CompanySummary>> {
        search.validate()?;
        COMPANIES.search(&search.criteria()).fetch_all_as(conn).await
    }

    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<Company> {
        COMPANIES
            .get(handle)
            .fetch_one_as(conn, not_found(handle))
            .await
    }

    pub async fn create(conn: &impl GenericClient, input: &NewCompany) -> JoblyResult<Company> {
        input.validate()?;
        let stmt = COMPANIES.insert(&input.to_fields())?;
        stmt.fetch_one_as(conn, not_found(&input.handle))
            .await
            .map_err(|e| match e {
                JoblyError::UniqueViolation(_) => JoblyError::UniqueViolation(format!(
                    "{}{}",
                    messages::COMPANY_ALREADY_EXISTS,
                    input.handle
                )),
                other => other,
            })
    }

    /// Partial update; `fields` may carry request metadata such as `_token`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        fields: &FieldMap,
    ) -> JoblyResult<Company> {
        COMPANIES
            .update(fields, handle)?
            .fetch_one_as(conn, not_found(handle))
            .await
    }

    pub async fn delete(conn: &impl GenericClient, handle: &str) -> JoblyResult<Company> {
        COMPANIES
            .delete(handle)
            .fetch_one_as(conn, not_found(handle))
            .await
    }
}
