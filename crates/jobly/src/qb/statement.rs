//! The output of every builder: SQL text plus its ordered parameters.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::qb::param::FieldValue;
use crate::row::FromRow;
use std::collections::BTreeSet;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A generated statement.
///
/// Placeholder `$N` in `text` is bound to `values[N - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStatement {
    pub text: String,
    pub values: Vec<FieldValue>,
}

impl GeneratedStatement {
    pub fn new(text: impl Into<String>, values: Vec<FieldValue>) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }

    /// Distinct placeholder numbers referenced by `text`.
    ///
    /// A placeholder may appear more than once (the search predicate reuses
    /// its index for every column), so this is a set.
    pub fn placeholder_indices(&self) -> BTreeSet<usize> {
        let bytes = self.text.as_bytes();
        let mut out = BTreeSet::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                // A bare `$` parses as empty and is skipped.
                if let Ok(n) = self.text[start..end].parse::<usize>() {
                    out.insert(n);
                }
                i = end;
            } else {
                i += 1;
            }
        }
        out
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    fn trace(&self) {
        tracing::debug!(
            target: "jobly.sql",
            param_count = self.values.len(),
            sql = %self.text,
            "executing statement"
        );
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        self.trace();
        conn.query(&self.text, &self.params_ref()).await
    }

    /// Execute and map all rows to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> JoblyResult<Option<Row>> {
        self.trace();
        conn.query_opt(&self.text, &self.params_ref()).await
    }

    /// Execute and map the first row to `T`, if any.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and map the first row to `T`.
    ///
    /// Zero rows is [`JoblyError::NotFound`] carrying `not_found`, which is
    /// how lookups, updates and deletes by key report a missing key.
    pub async fn fetch_one_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        not_found: impl Into<String>,
    ) -> JoblyResult<T> {
        self.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(not_found))
    }

    /// Execute and return the number of affected rows.
    pub async fn execute(&self, conn: &impl GenericClient) -> JoblyResult<u64> {
        self.trace();
        conn.execute(&self.text, &self.params_ref()).await
    }
}
