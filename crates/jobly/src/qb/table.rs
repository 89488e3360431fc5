//! Per-entity table metadata and the statements built from it.

use crate::error::JoblyResult;
use crate::qb::fields::FieldMap;
use crate::qb::filter::{Filter, FilterCriteria, build_filter_query};
use crate::qb::insert::build_insert;
use crate::qb::param::{FieldValue, ParamList};
use crate::qb::statement::GeneratedStatement;
use crate::qb::update::build_update;

/// Per-entity table metadata.
///
/// Every identifier the builders interpolate comes from here, and all of
/// them are `&'static str`: request data can pick values, never names.
///
/// - `writable`: columns a caller may insert or update. Other non-reserved
///   keys are rejected.
/// - `returning`: the columns a single-row result may expose. Sensitive
///   columns stay out of this list. It is required and must not be empty,
///   so no statement built from a `Table` ever selects `*`.
/// - `listing` / `order_by` / `filters`: shape of `all` and `search`.
///   `listing` defaults to `returning`.
///
/// # Panics
///
/// [`Table::new`] and [`Table::with_listing_cols`] panic on an empty column
/// list. In a `const` item that is a compile error.
///
/// # Example
///
/// ```rust
/// use jobly::qb::{FieldMap, Table};
///
/// const USERS: Table = Table::new("users", &["username", "first_name", "last_name"])
///     .with_key("username")
///     .with_writable_cols(&["first_name", "last_name"]);
///
/// let fields = FieldMap::new().with("first_name", "Ada");
/// let stmt = USERS.update(&fields, "ada").unwrap();
/// assert_eq!(
///     stmt.text,
///     "UPDATE users SET first_name=$1 WHERE username=$2 RETURNING username, first_name, last_name"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Table {
    name: &'static str,
    key: &'static str,
    writable: &'static [&'static str],
    returning: &'static [&'static str],
    listing: &'static [&'static str],
    order_by: &'static str,
    filters: &'static [Filter],
}

impl Table {
    pub const fn new(name: &'static str, returning: &'static [&'static str]) -> Self {
        assert!(!returning.is_empty(), "Table returning columns must not be empty");
        Self {
            name,
            key: "id",
            writable: &[],
            returning,
            listing: returning,
            order_by: "",
            filters: &[],
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub const fn writable(&self) -> &'static [&'static str] {
        self.writable
    }

    pub const fn returning(&self) -> &'static [&'static str] {
        self.returning
    }

    pub const fn listing(&self) -> &'static [&'static str] {
        self.listing
    }

    pub const fn with_key(mut self, col: &'static str) -> Self {
        self.key = col;
        self
    }

    pub const fn with_writable_cols(mut self, cols: &'static [&'static str]) -> Self {
        self.writable = cols;
        self
    }

    pub const fn with_listing_cols(mut self, cols: &'static [&'static str]) -> Self {
        assert!(!cols.is_empty(), "Table listing columns must not be empty");
        self.listing = cols;
        self
    }

    pub const fn with_order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = order_by;
        self
    }

    pub const fn with_filters(mut self, filters: &'static [Filter]) -> Self {
        self.filters = filters;
        self
    }

    /// Partial update by key, restricted to the writable columns.
    pub fn update(
        &self,
        fields: &FieldMap,
        key_value: impl Into<FieldValue>,
    ) -> JoblyResult<GeneratedStatement> {
        let permitted = fields.permit(self.name, self.writable)?;
        build_update(self.name, &permitted, self.key, key_value, Some(self.returning))
    }

    /// Insert, restricted to the writable columns.
    pub fn insert(&self, fields: &FieldMap) -> JoblyResult<GeneratedStatement> {
        let permitted = fields.permit(self.name, self.writable)?;
        build_insert(self.name, &permitted, Some(self.returning))
    }

    /// Filtered listing using this table's recognized filters.
    pub fn search(&self, criteria: &FilterCriteria) -> GeneratedStatement {
        build_filter_query(
            self.name,
            self.listing,
            self.filters,
            self.order_by,
            criteria,
        )
    }

    /// Unfiltered listing.
    pub fn all(&self) -> GeneratedStatement {
        self.search(&FilterCriteria::new())
    }

    /// Single row by key.
    pub fn get(&self, key_value: impl Into<FieldValue>) -> GeneratedStatement {
        let mut params = ParamList::new();
        let idx = params.push(key_value);
        GeneratedStatement::new(
            format!(
                "SELECT {} FROM {} WHERE {}=${idx}",
                self.returning.join(", "),
                self.name,
                self.key
            ),
            params.into_values(),
        )
    }

    /// Delete by key, returning the removed row.
    pub fn delete(&self, key_value: impl Into<FieldValue>) -> GeneratedStatement {
        let mut params = ParamList::new();
        let idx = params.push(key_value);
        GeneratedStatement::new(
            format!(
                "DELETE FROM {} WHERE {}=${idx} RETURNING {}",
                self.name,
                self.key,
                self.returning.join(", ")
            ),
            params.into_values(),
        )
    }
}
