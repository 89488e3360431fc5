//! Dynamic, parameter-safe statement builders.
//!
//! Two builders share one discipline: identifiers come from compile-time
//! constants, every value becomes a positional parameter, and placeholder
//! `$N` always pairs with the Nth entry of the returned value list.
//!
//! - [`build_update`]: partial `UPDATE ... SET ... WHERE key=$n RETURNING ...`
//!   from a [`FieldMap`].
//! - [`build_filter_query`]: `SELECT ... [WHERE ...] ORDER BY ...` from a
//!   fixed list of recognized [`Filter`]s and caller [`FilterCriteria`].
//!
//! Builders are pure functions: they never touch the database. Run the
//! resulting [`GeneratedStatement`] through a [`GenericClient`](crate::GenericClient).
//!
//! # Usage
//!
//! ```rust
//! use jobly::qb::{self, FieldMap, FieldValue};
//!
//! let fields = FieldMap::new().with("name", "Acme").with("_token", "x");
//! let stmt = qb::build_update("companies", &fields, "handle", "acme1", Some(&["handle", "name"]))?;
//! assert_eq!(
//!     stmt.text,
//!     "UPDATE companies SET name=$1 WHERE handle=$2 RETURNING handle, name"
//! );
//! assert_eq!(stmt.values, vec![FieldValue::from("Acme"), FieldValue::from("acme1")]);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

mod fields;
mod filter;
mod insert;
mod param;
mod statement;
mod table;
mod update;

pub use fields::{FieldMap, RESERVED_PREFIX, is_reserved};
pub use filter::{
    Filter, FilterCriteria, FilterKind, MatchPattern, build_filter_query, escape_like,
};
pub use insert::build_insert;
pub use param::{FieldValue, ParamList};
pub use statement::GeneratedStatement;
pub use table::Table;
pub use update::build_update;
