//! Partial UPDATE builder.

use crate::error::{JoblyError, JoblyResult};
use crate::qb::fields::FieldMap;
use crate::qb::param::{FieldValue, ParamList};
use crate::qb::statement::GeneratedStatement;

/// Render a `RETURNING` list.
///
/// `None` returns every column. An empty allow-list is rejected rather than
/// widened to `*`.
pub(crate) fn column_list(table: &str, cols: Option<&[&str]>) -> JoblyResult<String> {
    match cols {
        None => Ok("*".to_string()),
        Some([]) => Err(JoblyError::EmptyReturning {
            table: table.to_string(),
        }),
        Some(cols) => Ok(cols.join(", ")),
    }
}

/// Build `UPDATE <table> SET a=$1, b=$2 WHERE <key_column>=$3 RETURNING ...`.
///
/// Only the updatable entries of `fields` are written (see
/// [`FieldMap::updatable`]); they take placeholders `$1..$n` in map order and
/// the key value is always the last parameter, `$n+1`. `returning` limits the
/// result projection; `None` returns every column and an empty list fails
/// with [`JoblyError::EmptyReturning`].
///
/// `table`, `key_column` and `returning` are written into the SQL verbatim,
/// which is why they must be compile-time constants. Fails with
/// [`JoblyError::NoUpdatableFields`] before any SQL is produced if nothing
/// is left to set.
pub fn build_update(
    table: &'static str,
    fields: &FieldMap,
    key_column: &'static str,
    key_value: impl Into<FieldValue>,
    returning: Option<&[&'static str]>,
) -> JoblyResult<GeneratedStatement> {
    let (sets, mut params) = fields.updatable().fold(
        (Vec::new(), ParamList::new()),
        |(mut sets, mut params), (col, value)| {
            let idx = params.push(value.clone());
            sets.push(format!("{col}=${idx}"));
            (sets, params)
        },
    );

    if sets.is_empty() {
        return Err(JoblyError::NoUpdatableFields {
            table: table.to_string(),
        });
    }

    let returning = column_list(table, returning)?;
    let key_idx = params.push(key_value);
    let text = format!(
        "UPDATE {table} SET {} WHERE {key_column}=${key_idx} RETURNING {returning}",
        sets.join(", "),
    );

    tracing::debug!(
        target: "jobly.sql",
        table,
        param_count = params.len(),
        sql = %text,
        "built update statement"
    );

    Ok(GeneratedStatement::new(text, params.into_values()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TABLE: &str = "test";
    const TEST_KEY: &str = "id";

    #[test]
    fn single_field() {
        let fields = FieldMap::new().with("name", "updated name");
        let stmt = build_update(TEST_TABLE, &fields, TEST_KEY, 1i64, None).unwrap();
        assert_eq!(stmt.text, "UPDATE test SET name=$1 WHERE id=$2 RETURNING *");
        assert_eq!(
            stmt.values,
            vec![FieldValue::from("updated name"), FieldValue::Int(1)]
        );
    }

    #[test]
    fn several_fields_keep_map_order() {
        let fields = FieldMap::new()
            .with("name", "test")
            .with("password", "password")
            .with("email", "email");
        let stmt = build_update(TEST_TABLE, &fields, TEST_KEY, 1i64, None).unwrap();
        assert_eq!(
            stmt.text,
            "UPDATE test SET name=$1, password=$2, email=$3 WHERE id=$4 RETURNING *"
        );
        assert_eq!(stmt.values.last(), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn reserved_keys_are_excluded() {
        let fields = FieldMap::new().with("name", "name").with("_password", "password");
        let stmt = build_update(TEST_TABLE, &fields, TEST_KEY, 1i64, None).unwrap();
        assert_eq!(stmt.text, "UPDATE test SET name=$1 WHERE id=$2 RETURNING *");
        assert!(!stmt.values.contains(&FieldValue::from("password")));
    }

    #[test]
    fn null_values_are_bound_not_dropped() {
        let fields = FieldMap::new().with("logo_url", FieldValue::Null);
        let stmt = build_update("companies", &fields, "handle", "acme", None).unwrap();
        assert_eq!(
            stmt.text,
            "UPDATE companies SET logo_url=$1 WHERE handle=$2 RETURNING *"
        );
        assert_eq!(stmt.values[0], FieldValue::Null);
    }

    #[test]
    fn only_reserved_keys_is_an_error() {
        let fields = FieldMap::new().with("_token", "x");
        let err = build_update(TEST_TABLE, &fields, TEST_KEY, 1i64, None).unwrap_err();
        assert!(matches!(err, JoblyError::NoUpdatableFields { .. }));
    }

    #[test]
    fn empty_map_is_an_error() {
        let err = build_update(TEST_TABLE, &FieldMap::new(), TEST_KEY, 1i64, None).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn empty_returning_list_is_rejected() {
        let fields = FieldMap::new().with("first_name", "x");
        let err = build_update("users", &fields, "username", "ada", Some(&[])).unwrap_err();
        assert!(matches!(err, JoblyError::EmptyReturning { ref table } if table == "users"));
        assert_eq!(err.status(), 500);
    }
}
