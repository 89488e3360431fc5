//! Authentication collaborators and access guards.
//!
//! Token signing/verification and password hashing live outside this crate;
//! they plug in through [`TokenVerifier`] and [`PasswordHasher`]. What is
//! here is the part every route shares: turning a request token into an
//! optional [`AuthUser`] and checking login, ownership and admin rights.

use crate::config::messages;
use crate::error::{JoblyError, JoblyResult};
use serde::{Deserialize, Serialize};

/// The payload carried by a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

/// Verifies and issues request tokens.
pub trait TokenVerifier {
    type Error: std::fmt::Display;

    fn verify(&self, token: &str) -> Result<AuthUser, Self::Error>;

    fn issue(&self, user: &AuthUser) -> Result<String, Self::Error>;
}

/// One-way password hashing.
pub trait PasswordHasher {
    type Error: std::fmt::Display;

    fn hash(&self, password: &str) -> Result<String, Self::Error>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, Self::Error>;
}

/// Resolve the user behind a request token.
///
/// A missing or invalid token is not an error: the request carries on
/// anonymously and the guards below decide what it may do.
pub fn authenticate<V: TokenVerifier>(verifier: &V, token: Option<&str>) -> Option<AuthUser> {
    let token = token?;
    match verifier.verify(token) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid token");
            None
        }
    }
}

/// Require any logged-in user.
pub fn ensure_logged_in(user: Option<&AuthUser>) -> JoblyResult<&AuthUser> {
    user.ok_or_else(|| JoblyError::Unauthorized(messages::AUTH_NOT_LOGGED_IN.to_string()))
}

/// Require the logged-in user to be `username`.
pub fn ensure_same_user<'a>(user: Option<&'a AuthUser>, username: &str) -> JoblyResult<&'a AuthUser> {
    match user {
        Some(user) if user.username == username => Ok(user),
        _ => Err(JoblyError::Forbidden(messages::AUTH_NOT_SAME_USER.to_string())),
    }
}

/// Require an admin.
pub fn ensure_admin(user: Option<&AuthUser>) -> JoblyResult<&AuthUser> {
    match user {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(JoblyError::Forbidden(messages::AUTH_NOT_ADMIN.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts tokens of the form `user:<name>` / `admin:<name>`.
    struct PrefixVerifier;

    impl TokenVerifier for PrefixVerifier {
        type Error = String;

        fn verify(&self, token: &str) -> Result<AuthUser, String> {
            let (role, name) = token.split_once(':').ok_or("malformed")?;
            Ok(AuthUser {
                username: name.to_string(),
                is_admin: role == "admin",
            })
        }

        fn issue(&self, user: &AuthUser) -> Result<String, String> {
            let role = if user.is_admin { "admin" } else { "user" };
            Ok(format!("{role}:{}", user.username))
        }
    }

    fn user(name: &str, is_admin: bool) -> AuthUser {
        AuthUser {
            username: name.to_string(),
            is_admin,
        }
    }

    #[test]
    fn invalid_tokens_are_anonymous() {
        assert_eq!(authenticate(&PrefixVerifier, None), None);
        assert_eq!(authenticate(&PrefixVerifier, Some("garbage")), None);
        assert_eq!(
            authenticate(&PrefixVerifier, Some("admin:root")),
            Some(user("root", true))
        );
    }

    #[test]
    fn issued_tokens_verify() {
        let token = PrefixVerifier.issue(&user("ada", false)).unwrap();
        assert_eq!(authenticate(&PrefixVerifier, Some(&token)), Some(user("ada", false)));
    }

    #[test]
    fn logged_in_guard() {
        let err = ensure_logged_in(None).unwrap_err();
        assert_eq!(err.status(), 401);
        assert!(ensure_logged_in(Some(&user("ada", false))).is_ok());
    }

    #[test]
    fn same_user_guard() {
        let ada = user("ada", false);
        assert!(ensure_same_user(Some(&ada), "ada").is_ok());
        assert_eq!(ensure_same_user(Some(&ada), "bob").unwrap_err().status(), 403);
        assert_eq!(ensure_same_user(None, "ada").unwrap_err().status(), 403);
    }

    #[test]
    fn admin_guard() {
        assert!(ensure_admin(Some(&user("root", true))).is_ok());
        let err = ensure_admin(Some(&user("ada", false))).unwrap_err();
        assert_eq!(err.to_string(), format!("Forbidden: {}", messages::AUTH_NOT_ADMIN));
    }
}
