//! # jobly
//!
//! Data access for a companies / jobs / users service on PostgreSQL.
//!
//! ## Features
//!
//! - **Dynamic, parameter-safe SQL**: partial updates and filtered searches are
//!   built at runtime from whatever fields a request carries; values only ever
//!   travel as `$N` parameters (see [`qb`])
//! - **Compile-time identifiers**: table and column names come from
//!   `const` [`qb::Table`] metadata, never from request data
//! - **Type-safe mapping**: Row → Struct via [`FromRow`]
//! - **Transaction-friendly**: pass a transaction anywhere a [`GenericClient`] is expected
//! - **Auth guards**: login / ownership / admin checks over pluggable token
//!   and password collaborators (see [`auth`])
//!
//! ## Example
//!
//! ```ignore
//! use jobly::models::{Company, CompanySearch};
//! use jobly::qb::FieldMap;
//!
//! let config = jobly::AppConfig::from_env()?;
//! let pool = jobly::create_pool_from_config(&config)?;
//! let conn = jobly::checkout(&pool).await?;
//!
//! let found = Company::search(&conn, &CompanySearch {
//!     search: Some("acme".into()),
//!     ..Default::default()
//! }).await?;
//!
//! let fields = FieldMap::new().with("name", "Acme Corp").with("_token", token);
//! let updated = Company::update(&conn, "acme", &fields).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod qb;
pub mod row;
pub mod validate;

pub use auth::{AuthUser, PasswordHasher, TokenVerifier};
pub use client::GenericClient;
pub use config::AppConfig;
pub use error::{JoblyError, JoblyResult};
pub use qb::{FieldMap, FieldValue, FilterCriteria, GeneratedStatement, Table};
pub use row::{FromRow, RowExt};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use client::PoolClient;
#[cfg(feature = "pool")]
pub use pool::{checkout, create_pool, create_pool_from_config, create_pool_with_config};

#[cfg(feature = "pool")]
pub use deadpool_postgres::Pool;

pub use tokio_postgres;
