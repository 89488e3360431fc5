//! Users: registration, profile writes and password authentication.

use crate::auth::{AuthUser, PasswordHasher};
use crate::client::GenericClient;
use crate::config::messages;
use crate::error::{JoblyError, JoblyResult};
use crate::qb::{FieldMap, FieldValue, GeneratedStatement, Table};
use crate::row::{FromRow, RowExt};
use crate::validate::Checks;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tokio_postgres::Row;

/// `password` is writable but never returned; `is_admin` is neither.
pub const USERS: Table = Table::new(
    "users",
    &["username", "first_name", "last_name", "email", "photo_url"],
)
.with_key("username")
.with_writable_cols(&[
    "username",
    "password",
    "first_name",
    "last_name",
    "email",
    "photo_url",
])
.with_listing_cols(&["username", "first_name", "last_name", "email"])
.with_order_by("username");

const CREDENTIALS_SQL: &str = "SELECT username, password, is_admin FROM users WHERE username=$1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            photo_url: row.try_get_column("photo_url")?,
        })
    }
}

/// Listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl FromRow for UserSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
        })
    }
}

struct Credentials {
    username: String,
    password: String,
    is_admin: bool,
}

impl FromRow for Credentials {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            password: row.try_get_column("password")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> JoblyResult<()> {
        Checks::new()
            .non_empty("username", &self.username)
            .non_empty("password", &self.password)
            .non_empty("first_name", &self.first_name)
            .non_empty("last_name", &self.last_name)
            .email("email", &self.email)
            .url("photo_url", self.photo_url.as_deref())
            .finish()
    }

    /// Column values with `password` replaced by its hash.
    pub fn to_fields(&self, password_hash: &str) -> FieldMap {
        FieldMap::new()
            .with("username", self.username.as_str())
            .with("password", password_hash)
            .with("first_name", self.first_name.as_str())
            .with("last_name", self.last_name.as_str())
            .with("email", self.email.as_str())
            .with("photo_url", self.photo_url.clone())
    }
}

fn not_found(username: &str) -> String {
    format!("{}{username}", messages::USER_NOT_FOUND)
}

fn hash_password(hasher: &impl PasswordHasher, password: &str) -> JoblyResult<String> {
    hasher
        .hash(password)
        .map_err(|e| JoblyError::Other(format!("password hashing failed: {e}")))
}

fn already_exists(username: &str) -> JoblyError {
    JoblyError::UniqueViolation(format!("{}{username}", messages::USER_ALREADY_EXISTS))
}

/// `fields` with any `password` replaced by its hash.
///
/// A `password` that is not a non-empty string is a validation error.
fn hash_password_field<'a>(
    hasher: &impl PasswordHasher,
    fields: &'a FieldMap,
) -> JoblyResult<Cow<'a, FieldMap>> {
    match fields.get("password") {
        None => Ok(Cow::Borrowed(fields)),
        Some(FieldValue::Text(password)) if !password.is_empty() => {
            let hash = hash_password(hasher, password)?;
            let mut fields = fields.clone();
            fields.insert("password", hash);
            Ok(Cow::Owned(fields))
        }
        Some(_) => Err(JoblyError::validation("password must be a non-empty string")),
    }
}

fn invalid_credentials() -> JoblyError {
    JoblyError::Unauthorized(messages::AUTH_INVALID_PASSWORD.to_string())
}

impl User {
    /// All users, ordered by username.
    pub async fn all(conn: &impl GenericClient) -> JoblyResult<Vec<UserSummary>> {
        USERS.all().fetch_all_as(conn).await
    }

    pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<User> {
        USERS
            .get(username)
            .fetch_one_as(conn, not_found(username))
            .await
    }

    /// Validate, hash the password and insert.
    pub async fn register(
        conn: &impl GenericClient,
        hasher: &impl PasswordHasher,
        input: &NewUser,
    ) -> JoblyResult<User> {
        input.validate()?;
        let hash = hash_password(hasher, &input.password)?;
        let stmt = USERS.insert(&input.to_fields(&hash))?;
        stmt.fetch_one_as(conn, messages::USER_CREATE)
            .await
            .map_err(|e| match e {
                JoblyError::UniqueViolation(_) => already_exists(&input.username),
                other => other,
            })
    }

    /// Partial update. A new `password` is hashed before it is written.
    pub async fn update(
        conn: &impl GenericClient,
        hasher: &impl PasswordHasher,
        username: &str,
        fields: &FieldMap,
    ) -> JoblyResult<User> {
        let fields = hash_password_field(hasher, fields)?;
        USERS
            .update(&fields, username)?
            .fetch_one_as(conn, not_found(username))
            .await
    }

    pub async fn delete(conn: &impl GenericClient, username: &str) -> JoblyResult<User> {
        USERS
            .delete(username)
            .fetch_one_as(conn, not_found(username))
            .await
    }

    /// Check a username/password pair.
    ///
    /// An unknown user and a wrong password fail the same way.
    pub async fn authenticate(
        conn: &impl GenericClient,
        hasher: &impl PasswordHasher,
        username: &str,
        password: &str,
    ) -> JoblyResult<AuthUser> {
        let stmt = GeneratedStatement::new(CREDENTIALS_SQL, vec![FieldValue::from(username)]);
        let creds: Credentials = stmt
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(invalid_credentials)?;

        let matches = hasher
            .verify(password, &creds.password)
            .map_err(|e| JoblyError::Other(format!("password verification failed: {e}")))?;
        if !matches {
            tracing::debug!(username, "password mismatch");
            return Err(invalid_credentials());
        }

        Ok(AuthUser {
            username: creds.username,
            is_admin: creds.is_admin,
        })
    }
}
