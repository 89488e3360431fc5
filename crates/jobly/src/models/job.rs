//! Job postings: lookup, search and writes keyed by `id`.

use crate::client::GenericClient;
use crate::config::messages;
use crate::error::{JoblyError, JoblyResult};
use crate::models::company::Company;
use crate::qb::{FieldMap, Filter, FilterCriteria, MatchPattern, Table};
use crate::row::{FromRow, RowExt};
use crate::validate::Checks;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Job search: `search` matches the start of the title or company handle.
pub const JOB_FILTERS: &[Filter] = &[
    Filter::search("search", &["title", "company_handle"], MatchPattern::Prefix),
    Filter::min("min_salary", "salary"),
    Filter::min("min_equity", "equity"),
];

pub const JOBS: Table = Table::new(
    "jobs",
    &["id", "title", "salary", "equity", "company_handle", "date_posted"],
)
.with_writable_cols(&["title", "salary", "equity", "company_handle"])
.with_listing_cols(&["title", "company_handle"])
.with_order_by("date_posted DESC")
.with_filters(JOB_FILTERS);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
    pub date_posted: NaiveDateTime,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            date_posted: row.try_get_column("date_posted")?,
        })
    }
}

/// Listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub title: String,
    pub company_handle: String,
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            title: row.try_get_column("title")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job with its company expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company: Company,
    pub date_posted: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> JoblyResult<()> {
        Checks::new()
            .non_empty("title", &self.title)
            .non_empty("company_handle", &self.company_handle)
            .range("salary", self.salary.map(f64::from), 0.0, f64::from(i32::MAX))
            .range("equity", self.equity, 0.0, 1.0)
            .finish()
    }

    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("title", self.title.as_str())
            .with("salary", self.salary)
            .with("equity", self.equity)
            .with("company_handle", self.company_handle.as_str())
    }
}

/// `GET /jobs` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearch {
    pub search: Option<String>,
    pub min_salary: Option<i64>,
    pub min_equity: Option<f64>,
}

impl JobSearch {
    /// Equity is a fraction, so a lower bound above 1 can never match.
    pub fn validate(&self) -> JoblyResult<()> {
        match self.min_equity {
            Some(min) if min > 1.0 => Err(JoblyError::validation(messages::JOB_EQUITY)),
            _ => Ok(()),
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with("search", self.search.clone())
            .with("min_salary", self.min_salary)
            .with("min_equity", self.min_equity)
    }
}

fn not_found(id: i32) -> String {
    format!("{}{id}", messages::JOB_NOT_FOUND)
}

impl Job {
    /// All jobs as `{title, company_handle}`, newest first.
    pub async fn all(conn: &impl GenericClient) -> JoblyResult<Vec<JobSummary>> {
        JOBS.all().fetch_all_as(conn).await
    }

    pub async fn search(
        conn: &impl GenericClient,
        search: &JobSearch,
    ) -> JoblyResult<Vec<JobSummary>> {
        search.validate()?;
        JOBS.search(&search.criteria()).fetch_all_as(conn).await
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        JOBS.get(id).fetch_one_as(conn, not_found(id)).await
    }

    /// The job plus its company, fetched as two lookups.
    pub async fn get_detail(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
        let job = Self::get(conn, id).await?;
        let company = Company::get(conn, &job.company_handle).await?;
        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
            date_posted: job.date_posted,
        })
    }

    pub async fn create(conn: &impl GenericClient, input: &NewJob) -> JoblyResult<Job> {
        input.validate()?;
        let stmt = JOBS.insert(&input.to_fields())?;
        stmt.fetch_one_as(conn, messages::JOB_CREATE)
            .await
            .map_err(|e| match e {
                JoblyError::ForeignKeyViolation(_) | JoblyError::CheckViolation(_) => {
                    JoblyError::validation(messages::JOB_CREATE)
                }
                other => other,
            })
    }

    /// Partial update; `fields` may carry request metadata such as `_token`.
    pub async fn update(conn: &impl GenericClient, id: i32, fields: &FieldMap) -> JoblyResult<Job> {
        if let Some(equity) = fields.get("equity").and_then(|v| v.as_f64()) {
            Checks::new().range("equity", Some(equity), 0.0, 1.0).finish()?;
        }
        JOBS.update(fields, id)?
            .fetch_one_as(conn, not_found(id))
            .await
    }

    pub async fn delete(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        JOBS.delete(id).fetch_one_as(conn, not_found(id)).await
    }
}
