use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tutorium_core::AppError;

/// Predefined instructor role categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructorRole {
    /// Full control over the course, including course settings.
    #[serde(rename = "Co-owner")]
    CoOwner,
    /// Manages instructors, sessions and students but not course settings.
    #[serde(rename = "Manager")]
    Manager,
    /// Read-only access to students and sessions.
    #[serde(rename = "Observer")]
    Observer,
    /// Views and submits sessions in sections.
    #[serde(rename = "Tutor")]
    Tutor,
    /// Starts with no privileges; everything is granted explicitly.
    #[serde(rename = "Custom")]
    Custom,
}

impl InstructorRole {
    /// Returns the stable display and storage label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoOwner => "Co-owner",
            Self::Manager => "Manager",
            Self::Observer => "Observer",
            Self::Tutor => "Tutor",
            Self::Custom => "Custom",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[InstructorRole] = &[
            InstructorRole::CoOwner,
            InstructorRole::Manager,
            InstructorRole::Observer,
            InstructorRole::Tutor,
            InstructorRole::Custom,
        ];

        ALL
    }
}

impl Display for InstructorRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for InstructorRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value.trim())
            .ok_or_else(|| AppError::InvalidParameters(format!("unknown instructor role '{value}'")))
    }
}
