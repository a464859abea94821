use async_trait::async_trait;

use tutorium_core::{AppError, AppResult};
use tutorium_domain::{
    InstructorPermission, InstructorPermissionKey, InstructorPrivileges, InstructorRole,
};

/// Repository port for instructor permission records.
///
/// Implementations enforce uniqueness of `(course_id, instructor_email)`
/// atomically and return records in storage order.
#[async_trait]
pub trait InstructorPermissionRepository: Send + Sync {
    /// Persists a new record.
    ///
    /// Fails with [`AppError::AlreadyExists`] when the composite key is taken.
    async fn create(&self, permission: InstructorPermission) -> AppResult<InstructorPermission>;

    /// Lists records of one instructor across courses.
    async fn find_by_email(&self, instructor_email: &str) -> AppResult<Vec<InstructorPermission>>;

    /// Lists records of one course across instructors.
    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<InstructorPermission>>;

    /// Finds the record for a composite key.
    async fn find_one(
        &self,
        course_id: &str,
        instructor_email: &str,
    ) -> AppResult<Option<InstructorPermission>>;

    /// Applies an update to the stored record of a composite key.
    ///
    /// The read of the current record and the write of the merged record
    /// happen as one step, so concurrent updates never overwrite each other
    /// with stale state. Fails with [`AppError::NotFound`] when no record has
    /// the key.
    async fn update(
        &self,
        course_id: &str,
        instructor_email: &str,
        input: UpdateInstructorPermissionInput,
    ) -> AppResult<InstructorPermission>;

    /// Removes a record and reports whether it existed.
    async fn delete(&self, course_id: &str, instructor_email: &str) -> AppResult<bool>;

    /// Removes all records of a course and returns how many were removed.
    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64>;
}

/// Changes applied by an update.
///
/// A role change without explicit privileges resets privileges to the new
/// role's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateInstructorPermissionInput {
    /// New role label.
    pub role: Option<InstructorRole>,
    /// New privilege set.
    pub privileges: Option<InstructorPrivileges>,
}

impl UpdateInstructorPermissionInput {
    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.privileges.is_none()
    }

    /// Merges the update into the current record.
    #[must_use]
    pub fn apply_to(self, current: InstructorPermission) -> InstructorPermission {
        let role = self.role.unwrap_or(current.role());
        let privileges = match (self.privileges, self.role) {
            (Some(privileges), _) => privileges,
            (None, Some(_)) => InstructorPrivileges::for_role(role),
            (None, None) => current.privileges().clone(),
        };

        current.with_grant(role, privileges)
    }
}

/// Error returned when a composite key is already taken.
#[must_use]
pub fn permission_already_exists(key: &InstructorPermissionKey) -> AppError {
    AppError::AlreadyExists(format!(
        "trying to create an instructor permission that exists: {key}"
    ))
}

/// Error returned when no record exists for a composite key.
#[must_use]
pub fn permission_not_found(course_id: &str, instructor_email: &str) -> AppError {
    AppError::NotFound(format!(
        "instructor permission does not exist: {instructor_email}, {course_id}"
    ))
}
