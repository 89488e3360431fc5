//! Input validation helpers used by the create operations.

use crate::error::{JoblyError, JoblyResult};
use std::sync::OnceLock;

/// Best-effort email validation.
///
/// This is intentionally not fully RFC-compliant.
pub fn is_email(s: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Collects field errors so a request can report all of them at once.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{field} must not be empty"));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_email(value) {
            self.errors.push(format!("{field} is not a valid email"));
        }
        self
    }

    /// Optional URL: `None` passes.
    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if !is_url(value) {
                self.errors.push(format!("{field} is not a valid URL"));
            }
        }
        self
    }

    pub fn range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) -> &mut Self {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.errors
                    .push(format!("{field} must be between {min} and {max}"));
            }
        }
        self
    }

    /// `Ok` if every check passed, otherwise one validation error listing all failures.
    pub fn finish(&self) -> JoblyResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(JoblyError::validation(self.errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_and_url() {
        assert!(is_email("ada@example.com"));
        assert!(!is_email("not-an-email"));
        assert!(is_url("https://example.com/logo.png"));
        assert!(!is_url("not a url"));
    }

    #[test]
    fn checks_collect_every_failure() {
        let err = Checks::new()
            .non_empty("username", " ")
            .email("email", "nope")
            .url("photo_url", Some("nope"))
            .range("equity", Some(1.5), 0.0, 1.0)
            .finish()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("username must not be empty"));
        assert!(msg.contains("email is not a valid email"));
        assert!(msg.contains("photo_url is not a valid URL"));
        assert!(msg.contains("equity must be between 0 and 1"));
    }

    #[test]
    fn checks_pass() {
        assert!(
            Checks::new()
                .non_empty("name", "Acme")
                .url("logo_url", None)
                .range("equity", None, 0.0, 1.0)
                .finish()
                .is_ok()
        );
    }
}
