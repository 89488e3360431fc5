//! INSERT builder for the create operations.

use crate::error::{JoblyError, JoblyResult};
use crate::qb::fields::FieldMap;
use crate::qb::param::ParamList;
use crate::qb::statement::GeneratedStatement;
use crate::qb::update::column_list;

/// Build `INSERT INTO <table> (a, b) VALUES ($1, $2) RETURNING ...`.
///
/// Follows the same rules as [`build_update`](crate::qb::build_update):
/// reserved keys are skipped, placeholders follow map order, an empty
/// column list is rejected with [`JoblyError::NoUpdatableFields`] and an
/// empty `returning` list with [`JoblyError::EmptyReturning`].
pub fn build_insert(
    table: &'static str,
    fields: &FieldMap,
    returning: Option<&[&'static str]>,
) -> JoblyResult<GeneratedStatement> {
    let (columns, placeholders, params) = fields.updatable().fold(
        (Vec::new(), Vec::new(), ParamList::new()),
        |(mut columns, mut placeholders, mut params), (col, value)| {
            let idx = params.push(value.clone());
            columns.push(col);
            placeholders.push(format!("${idx}"));
            (columns, placeholders, params)
        },
    );

    if columns.is_empty() {
        return Err(JoblyError::NoUpdatableFields {
            table: table.to_string(),
        });
    }

    let returning = column_list(table, returning)?;
    let text = format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING {returning}",
        columns.join(", "),
        placeholders.join(", "),
    );

    tracing::debug!(
        target: "jobly.sql",
        table,
        param_count = params.len(),
        sql = %text,
        "built insert statement"
    );

    Ok(GeneratedStatement::new(text, params.into_values()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::param::FieldValue;

    #[test]
    fn insert_in_map_order() {
        let fields = FieldMap::new()
            .with("title", "Engineer")
            .with("_token", "t")
            .with("salary", 100_000)
            .with("company_handle", "acme");
        let stmt = build_insert("jobs", &fields, Some(&["id", "title"])).unwrap();
        assert_eq!(
            stmt.text,
            "INSERT INTO jobs (title, salary, company_handle) VALUES ($1, $2, $3) RETURNING id, title"
        );
        assert_eq!(
            stmt.values,
            vec![
                FieldValue::from("Engineer"),
                FieldValue::Int(100_000),
                FieldValue::from("acme")
            ]
        );
    }

    #[test]
    fn insert_with_empty_returning_is_rejected() {
        let fields = FieldMap::new().with("title", "Engineer");
        assert!(matches!(
            build_insert("jobs", &fields, Some(&[])),
            Err(JoblyError::EmptyReturning { .. })
        ));
    }

    #[test]
    fn insert_without_columns_is_rejected() {
        let fields = FieldMap::new().with("_token", "t");
        assert!(matches!(
            build_insert("jobs", &fields, None),
            Err(JoblyError::NoUpdatableFields { .. })
        ));
    }
}
