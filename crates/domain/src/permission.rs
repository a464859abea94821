use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tutorium_core::AppResult;

use crate::{CourseId, EmailAddress, InstructorPrivileges, InstructorRole};

/// Composite key identifying one instructor's permission in one course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructorPermissionKey {
    course_id: CourseId,
    instructor_email: EmailAddress,
}

impl InstructorPermissionKey {
    /// Creates a key from validated parts.
    #[must_use]
    pub fn new(course_id: CourseId, instructor_email: EmailAddress) -> Self {
        Self {
            course_id,
            instructor_email,
        }
    }

    /// Returns the course identifier.
    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Returns the instructor email.
    #[must_use]
    pub fn instructor_email(&self) -> &EmailAddress {
        &self.instructor_email
    }
}

impl Display for InstructorPermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}, {}", self.instructor_email, self.course_id)
    }
}

/// Role and privileges granted to one instructor in one course.
///
/// Key fields are fixed at construction; only the role and privileges change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPermission {
    course_id: CourseId,
    instructor_email: EmailAddress,
    role: InstructorRole,
    privileges: InstructorPrivileges,
}

impl InstructorPermission {
    /// Creates a validated permission record.
    pub fn new(
        course_id: impl Into<String>,
        instructor_email: impl Into<String>,
        role: InstructorRole,
        privileges: InstructorPrivileges,
    ) -> AppResult<Self> {
        Ok(Self::from_parts(
            CourseId::new(course_id)?,
            EmailAddress::new(instructor_email)?,
            role,
            privileges,
        ))
    }

    /// Creates a permission record carrying the role's default privileges.
    pub fn with_role_defaults(
        course_id: impl Into<String>,
        instructor_email: impl Into<String>,
        role: InstructorRole,
    ) -> AppResult<Self> {
        Self::new(
            course_id,
            instructor_email,
            role,
            InstructorPrivileges::for_role(role),
        )
    }

    /// Creates a permission record from already validated parts.
    #[must_use]
    pub fn from_parts(
        course_id: CourseId,
        instructor_email: EmailAddress,
        role: InstructorRole,
        privileges: InstructorPrivileges,
    ) -> Self {
        Self {
            course_id,
            instructor_email,
            role,
            privileges,
        }
    }

    /// Returns the course identifier.
    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Returns the instructor email.
    #[must_use]
    pub fn instructor_email(&self) -> &EmailAddress {
        &self.instructor_email
    }

    /// Returns the role label.
    #[must_use]
    pub fn role(&self) -> InstructorRole {
        self.role
    }

    /// Returns the privilege set.
    #[must_use]
    pub fn privileges(&self) -> &InstructorPrivileges {
        &self.privileges
    }

    /// Returns the composite key of this record.
    #[must_use]
    pub fn key(&self) -> InstructorPermissionKey {
        InstructorPermissionKey::new(self.course_id.clone(), self.instructor_email.clone())
    }

    /// Returns whether this record belongs to the given key.
    #[must_use]
    pub fn matches(&self, course_id: &str, instructor_email: &str) -> bool {
        self.course_id.as_str() == course_id && self.instructor_email.as_str() == instructor_email
    }

    /// Returns a copy with a new role and privilege set.
    #[must_use]
    pub fn with_grant(self, role: InstructorRole, privileges: InstructorPrivileges) -> Self {
        Self {
            role,
            privileges,
            ..self
        }
    }
}
