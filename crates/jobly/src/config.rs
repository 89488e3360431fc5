//! Application configuration.
//!
//! Values are read from the process environment (after loading a `.env`
//! file, if present):
//!
//! | variable            | default                                   |
//! |---------------------|-------------------------------------------|
//! | `SECRET_KEY`        | `test`                                    |
//! | `PORT`              | `3000`                                    |
//! | `APP_ENV`           | unset; `test` selects the test database   |
//! | `DATABASE_URL`      | `dbname=jobly` (ignored when `APP_ENV=test`) |
//! | `DB_POOL_SIZE`      | `16`                                      |
//! | `BCRYPT_WORK_FACTOR`| `12`                                      |

use crate::error::{JoblyError, JoblyResult};
use std::str::FromStr;

/// Connection string used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "dbname=jobly";

/// Connection string used when `APP_ENV=test`.
pub const TEST_DATABASE_URL: &str = "dbname=jobly-test";

/// Client-facing error messages.
pub mod messages {
    pub const COMPANY_NOT_FOUND: &str = "Cannot find company for ";
    pub const COMPANY_ALREADY_EXISTS: &str = "Company already exists for ";
    pub const COMPANY_MIN_MAX_EMPLOYEES: &str = "Min cannot be larger than Max!";
    pub const JOB_NOT_FOUND: &str = "Cannot find job with id ";
    pub const JOB_CREATE: &str = "Error creating new job.";
    pub const JOB_EQUITY: &str = "Min equity cannot be greater than 1";
    pub const USER_NOT_FOUND: &str = "Cannot find user for ";
    pub const USER_CREATE: &str = "Error creating new user.";
    pub const USER_ALREADY_EXISTS: &str = "User already exists for ";
    pub const AUTH_INVALID_PASSWORD: &str = "Password doesn't match our records.";
    pub const AUTH_NOT_LOGGED_IN: &str = "Only available to logged in users.";
    pub const AUTH_NOT_SAME_USER: &str = "You can only perform this action on yourself.";
    pub const AUTH_NOT_ADMIN: &str = "Only admin users can perform this action.";
}

/// Runtime configuration shared by the data-access layer and its callers.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Key the external token service signs with.
    pub secret_key: String,
    /// Port the HTTP front end should bind.
    pub port: u16,
    /// `tokio-postgres` connection string.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: usize,
    /// Cost passed to the external password hasher.
    pub bcrypt_work_factor: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: "test".to_string(),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: 16,
            bcrypt_work_factor: 12,
        }
    }
}

impl AppConfig {
    /// Load from the environment, reading `.env` first if it exists.
    pub fn from_env() -> JoblyResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (the environment, a map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let defaults = Self::default();
        let is_test = lookup("APP_ENV").is_some_and(|env| env == "test");

        let database_url = if is_test {
            TEST_DATABASE_URL.to_string()
        } else {
            lookup("DATABASE_URL").unwrap_or(defaults.database_url)
        };

        Ok(Self {
            secret_key: lookup("SECRET_KEY").unwrap_or(defaults.secret_key),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            database_url,
            pool_size: parse_var(&lookup, "DB_POOL_SIZE")?.unwrap_or(defaults.pool_size),
            bcrypt_work_factor: parse_var(&lookup, "BCRYPT_WORK_FACTOR")?
                .unwrap_or(defaults.bcrypt_work_factor),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> JoblyResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| JoblyError::Config(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}
