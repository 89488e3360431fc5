//! Statement shapes produced by the entity tables, without a database.

use jobly::JoblyError;
use jobly::models::{COMPANIES, CompanySearch, JOBS, JobSearch, USERS};
use jobly::qb::{FieldMap, FieldValue, FilterCriteria};

#[test]
fn request_body_updates_keep_document_order() {
    let body = r#"{"_token": "abc", "num_employees": 25, "name": "Acme Corp"}"#;
    let fields: FieldMap = serde_json::from_str(body).unwrap();
    let stmt = COMPANIES.update(&fields, "acme").unwrap();

    assert_eq!(
        stmt.text,
        "UPDATE companies SET num_employees=$1, name=$2 WHERE handle=$3 \
         RETURNING handle, name, num_employees, description, logo_url"
    );
    assert_eq!(
        stmt.values,
        vec![
            FieldValue::Int(25),
            FieldValue::from("Acme Corp"),
            FieldValue::from("acme")
        ]
    );
}

#[test]
fn json_value_bodies_keep_document_order() {
    let body = serde_json::json!({ "num_employees": 25, "_token": "abc", "name": "Acme Corp" });
    let fields = FieldMap::try_from(body).unwrap();
    let stmt = COMPANIES.update(&fields, "acme").unwrap();
    assert!(stmt.text.starts_with("UPDATE companies SET num_employees=$1, name=$2 WHERE handle=$3"));
}

#[test]
fn metadata_only_body_is_rejected() {
    let fields = FieldMap::new().with("_token", "abc");
    let err = JOBS.update(&fields, 1).unwrap_err();
    assert!(matches!(err, JoblyError::NoUpdatableFields { .. }));
    assert_eq!(err.status(), 400);
}

#[test]
fn unknown_columns_are_rejected() {
    let fields = FieldMap::new().with("name; DROP TABLE companies", "x");
    let err = COMPANIES.update(&fields, "acme").unwrap_err();
    assert!(matches!(err, JoblyError::UnknownColumn { .. }));
}

#[test]
fn query_string_search_ignores_unknown_keys() {
    let query = serde_json::json!({ "search": "net", "page": 2, "max_employees": 100 });
    let criteria: FilterCriteria = serde_json::from_value(query).unwrap();
    let stmt = COMPANIES.search(&criteria);

    assert_eq!(
        stmt.text,
        "SELECT handle, name FROM companies \
         WHERE (handle ILIKE $1 OR name ILIKE $1) AND num_employees <= $2 ORDER BY name"
    );
    assert_eq!(stmt.values, vec![FieldValue::from("%net%"), FieldValue::Int(100)]);
}

#[test]
fn search_text_is_matched_literally() {
    let search = JobSearch {
        search: Some("100%_".into()),
        ..Default::default()
    };
    let stmt = JOBS.search(&search.criteria());
    assert_eq!(stmt.values, vec![FieldValue::from("100\\%\\_%")]);
}

#[test]
fn empty_search_lists_everything() {
    let stmt = COMPANIES.search(&CompanySearch::default().criteria());
    assert_eq!(stmt.text, "SELECT handle, name FROM companies ORDER BY name");
    assert!(stmt.values.is_empty());

    let stmt = USERS.all();
    assert_eq!(
        stmt.text,
        "SELECT username, first_name, last_name, email FROM users ORDER BY username"
    );
}

#[test]
fn zero_bounds_count_as_absent() {
    let search = JobSearch {
        search: Some(String::new()),
        min_salary: Some(0),
        min_equity: Some(0.0),
    };
    let stmt = JOBS.search(&search.criteria());
    assert_eq!(
        stmt.text,
        "SELECT title, company_handle FROM jobs ORDER BY date_posted DESC"
    );
}

#[test]
fn placeholders_match_values() {
    let criteria = FilterCriteria::new()
        .with("search", "eng")
        .with("min_salary", 1000)
        .with("min_equity", 0.5);
    let stmt = JOBS.search(&criteria);
    let indices: Vec<usize> = stmt.placeholder_indices().into_iter().collect();
    assert_eq!(indices, (1..=stmt.values.len()).collect::<Vec<_>>());
}
