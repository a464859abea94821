use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tutorium_core::{AppError, AppResult, NonEmptyString};

/// Maximum accepted course identifier length.
pub const COURSE_ID_MAX_LENGTH: usize = 40;

/// Validated course identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(NonEmptyString);

impl CourseId {
    /// Creates a validated course identifier.
    ///
    /// Accepts ASCII letters, digits and `.`, `_`, `-`, `$`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = NonEmptyString::new(value)
            .map_err(|_| AppError::InvalidParameters("course id must not be empty".to_owned()))?;

        if value.as_str().chars().count() > COURSE_ID_MAX_LENGTH {
            return Err(AppError::InvalidParameters(format!(
                "course id '{}' must not exceed {COURSE_ID_MAX_LENGTH} characters",
                value.as_str()
            )));
        }

        if let Some(invalid) = value
            .as_str()
            .chars()
            .find(|character| !is_course_id_character(*character))
        {
            return Err(AppError::InvalidParameters(format!(
                "course id '{}' contains invalid character '{invalid}'",
                value.as_str()
            )));
        }

        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_course_id_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-' | '$')
}

impl Display for CourseId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.0.into()
    }
}

#[cfg(test)]
mod tests {
    use tutorium_core::AppError;

    use super::{COURSE_ID_MAX_LENGTH, CourseId};

    #[test]
    fn accepts_typical_course_ids() {
        for value in ["CS2103", "courseIdForIPL", "cs1010.tut-2$b_x"] {
            assert!(CourseId::new(value).is_ok(), "{value} should be valid");
        }
    }

    #[test]
    fn rejects_blank_and_spaced_course_ids() {
        assert!(CourseId::new("   ").is_err());
        assert!(CourseId::new("CS 2103").is_err());
    }

    #[test]
    fn rejects_overlong_course_id() {
        let value = "c".repeat(COURSE_ID_MAX_LENGTH + 1);
        assert!(CourseId::new(value).is_err());
    }

    #[test]
    fn length_limit_counts_characters() {
        let value = format!("{}é", "c".repeat(COURSE_ID_MAX_LENGTH - 1));
        match CourseId::new(value) {
            Err(AppError::InvalidParameters(message)) => {
                assert!(message.contains("invalid character 'é'"), "{message}");
            }
            other => panic!("expected invalid character error, got {other:?}"),
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let course_id = CourseId::new(" CS2103 ").unwrap_or_else(|_| unreachable!());
        assert_eq!(course_id.as_str(), "CS2103");
    }
}
