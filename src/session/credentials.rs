//! Credentials projected from a form snapshot, plus the optional pre-submit
//! validation stage. The password is kept in a `SecretString` and must never be
//! logged.

use crate::form::{EMAIL_FIELD, FieldStateSnapshot, PASSWORD_FIELD};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::{fmt, sync::LazyLock};
use thiserror::Error;

static EMAIL_FORMAT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("snapshot has no `{0}` field")]
pub struct MissingFieldError(pub &'static str);

/// The two values the login endpoint expects.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: SecretString::from(password),
        }
    }

    /// Projects a snapshot onto `email-address` and `password`. Values are taken
    /// as-is, empty strings included.
    ///
    /// # Errors
    /// Returns `MissingFieldError` if the snapshot was built from a registry
    /// without one of the two credential fields.
    pub fn from_snapshot(snapshot: &FieldStateSnapshot) -> Result<Self, MissingFieldError> {
        let email = snapshot
            .get(EMAIL_FIELD)
            .ok_or(MissingFieldError(EMAIL_FIELD))?;
        let password = snapshot
            .get(PASSWORD_FIELD)
            .ok_or(MissingFieldError(PASSWORD_FIELD))?;
        Ok(Self::new(email, password))
    }

    /// Request body for `POST /login`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }
}

/// A failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    InvalidEmail,
    EmptyPassword,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => f.write_str("invalid email format"),
            Self::EmptyPassword => f.write_str("password is required"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(pub Vec<ValidationIssue>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&issues.join(", "))
    }
}

pub type ValidationResult = Result<(), ValidationErrors>;

/// Checks credentials before they are sent. Every failed rule is reported.
///
/// # Errors
/// Returns `ValidationErrors` listing each rule the credentials break.
pub fn validate(credentials: &Credentials) -> ValidationResult {
    let mut issues = Vec::new();

    let email_ok = EMAIL_FORMAT
        .as_ref()
        .is_some_and(|format| format.is_match(credentials.email.trim()));
    if !email_ok {
        issues.push(ValidationIssue::InvalidEmail);
    }

    if credentials.password.expose_secret().trim().is_empty() {
        issues.push(ValidationIssue::EmptyPassword);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(issues))
    }
}
