//! Filtered SELECT builder.
//!
//! Each entity declares the filters it recognizes as a const slice of
//! [`Filter`]s. The builder walks that slice, not the caller's criteria, so
//! the generated SQL only depends on which filters are present.

use crate::qb::param::{FieldValue, ParamList};
use crate::qb::statement::GeneratedStatement;
use serde::Deserialize;
use std::collections::HashMap;

/// How a free-text search value is turned into an `ILIKE` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPattern {
    /// `value%`: the column starts with the search text.
    Prefix,
    /// `%value%`: the column contains the search text.
    Substring,
}

impl MatchPattern {
    /// Wrap `text` into a pattern. LIKE metacharacters in `text` are escaped,
    /// so user input always matches literally.
    pub fn apply(self, text: &str) -> String {
        let escaped = escape_like(text);
        match self {
            MatchPattern::Prefix => format!("{escaped}%"),
            MatchPattern::Substring => format!("%{escaped}%"),
        }
    }
}

/// Escape `\`, `%` and `_` with the default LIKE escape character.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// What a recognized filter key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `(a ILIKE $n OR b ILIKE $n)`
    Search {
        columns: &'static [&'static str],
        pattern: MatchPattern,
    },
    /// `column >= $n`
    Min { column: &'static str },
    /// `column <= $n`
    Max { column: &'static str },
}

/// A recognized filter key and the predicate it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub key: &'static str,
    pub kind: FilterKind,
}

impl Filter {
    pub const fn search(
        key: &'static str,
        columns: &'static [&'static str],
        pattern: MatchPattern,
    ) -> Self {
        Self {
            key,
            kind: FilterKind::Search { columns, pattern },
        }
    }

    pub const fn min(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            kind: FilterKind::Min { column },
        }
    }

    pub const fn max(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            kind: FilterKind::Max { column },
        }
    }

    /// Append this filter's predicate, binding `value` to one new placeholder.
    fn predicate(&self, value: &FieldValue, params: &mut ParamList) -> String {
        match self.kind {
            FilterKind::Search { columns, pattern } => {
                let text = match value {
                    FieldValue::Text(s) => s.clone(),
                    FieldValue::Int(i) => i.to_string(),
                    FieldValue::Float(f) => f.to_string(),
                    FieldValue::Bool(b) => b.to_string(),
                    FieldValue::Null => String::new(),
                };
                let idx = params.push(pattern.apply(&text));
                let alternatives: Vec<String> = columns
                    .iter()
                    .map(|col| format!("{col} ILIKE ${idx}"))
                    .collect();
                format!("({})", alternatives.join(" OR "))
            }
            FilterKind::Min { column } => {
                let idx = params.push(value.clone());
                format!("{column} >= ${idx}")
            }
            FilterKind::Max { column } => {
                let idx = params.push(value.clone());
                format!("{column} <= ${idx}")
            }
        }
    }
}

/// Caller-supplied filter values, keyed by filter key.
///
/// A key that is missing, or whose value is not truthy
/// ([`FieldValue::is_truthy`]), does not constrain the query. Keys that no
/// [`Filter`] recognizes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    values: HashMap<String, FieldValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Chainable form of [`FilterCriteria::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// The value for `key` if it should constrain the query.
    pub fn present(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).filter(|v| v.is_truthy())
    }
}

/// Build `SELECT <projection> FROM <table> [WHERE p1 AND p2 ...] ORDER BY <order_by>`.
///
/// `filters` is walked in slice order; each filter present in `criteria`
/// contributes one predicate and one parameter, so parameter numbering stays
/// contiguous whichever filters are omitted. With no present filters the
/// `WHERE` clause is left out entirely. An empty `projection` selects `*`;
/// [`Table::search`](crate::qb::Table::search) always passes a non-empty one.
///
/// Values are not range-checked here: contradictory or out-of-range bounds
/// produce a valid statement that simply matches nothing. Callers validate
/// domains before building.
pub fn build_filter_query(
    table: &'static str,
    projection: &[&'static str],
    filters: &[Filter],
    order_by: &'static str,
    criteria: &FilterCriteria,
) -> GeneratedStatement {
    let (predicates, params) = filters.iter().fold(
        (Vec::new(), ParamList::new()),
        |(mut predicates, mut params), filter| {
            if let Some(value) = criteria.present(filter.key) {
                predicates.push(filter.predicate(value, &mut params));
            }
            (predicates, params)
        },
    );

    let columns = if projection.is_empty() {
        "*".to_string()
    } else {
        projection.join(", ")
    };
    let mut text = format!("SELECT {columns} FROM {table}");
    if !predicates.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&predicates.join(" AND "));
    }
    if !order_by.is_empty() {
        text.push_str(" ORDER BY ");
        text.push_str(order_by);
    }

    tracing::debug!(
        target: "jobly.sql",
        table,
        param_count = params.len(),
        sql = %text,
        "built filter query"
    );

    GeneratedStatement::new(text, params.into_values())
}
