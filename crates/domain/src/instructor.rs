//! Instructor identity types.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tutorium_core::{AppError, AppResult};

/// Maximum accepted email address length.
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Validated instructor email address.
///
/// The address keeps its original casing so lookups compare exactly what
/// was stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs structural validation: non-empty, exactly one `@`, non-empty
    /// local part, and a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::InvalidParameters(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::InvalidParameters(format!(
                "email address '{trimmed}' must contain an '@'"
            )));
        };

        if domain.contains('@') {
            return Err(AppError::InvalidParameters(format!(
                "email address '{trimmed}' must contain exactly one '@'"
            )));
        }

        if local.is_empty() {
            return Err(AppError::InvalidParameters(format!(
                "email address '{trimmed}' has an empty local part"
            )));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::InvalidParameters(format!(
                "email address '{trimmed}' has an invalid domain"
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::InvalidParameters(format!(
                "email address '{trimmed}' must not contain whitespace"
            )));
        }

        if trimmed.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AppError::InvalidParameters(format!(
                "email address must not exceed {EMAIL_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EmailAddress {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
