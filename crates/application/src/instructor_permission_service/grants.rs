use super::*;

use tracing::{info, warn};
use tutorium_core::{AppError, AppResult};
use tutorium_domain::{InstructorPermission, InstructorPrivileges, InstructorRole};

use crate::UpdateInstructorPermissionInput;

impl InstructorPermissionService {
    /// Grants a role and privileges to an instructor in a course.
    ///
    /// Fails with [`AppError::InvalidParameters`] for a malformed course id or
    /// email, and with [`AppError::AlreadyExists`] when the instructor already
    /// holds a permission in the course.
    pub async fn add_instructor_permission(
        &self,
        course_id: &str,
        instructor_email: &str,
        role: InstructorRole,
        privileges: InstructorPrivileges,
    ) -> AppResult<InstructorPermission> {
        let permission = InstructorPermission::new(course_id, instructor_email, role, privileges)?;
        self.add_instructor_permission_record(permission).await
    }

    /// Persists a pre-built permission record.
    pub async fn add_instructor_permission_record(
        &self,
        permission: InstructorPermission,
    ) -> AppResult<InstructorPermission> {
        let key = permission.key();

        match self.repository.create(permission).await {
            Ok(created) => {
                info!(
                    course_id = %created.course_id(),
                    instructor_email = %created.instructor_email(),
                    role = %created.role(),
                    "instructor permission created"
                );
                Ok(created)
            }
            Err(AppError::AlreadyExists(message)) => {
                warn!(
                    course_id = %key.course_id(),
                    instructor_email = %key.instructor_email(),
                    "rejected duplicate instructor permission"
                );
                Err(AppError::AlreadyExists(message))
            }
            Err(error) => Err(error),
        }
    }

    /// Changes the role and/or privileges of an existing permission.
    ///
    /// A role change without explicit privileges resets the privileges to the
    /// new role's defaults. The merge runs inside the store.
    pub async fn update_instructor_permission_by_email(
        &self,
        course_id: &str,
        instructor_email: &str,
        input: UpdateInstructorPermissionInput,
    ) -> AppResult<InstructorPermission> {
        let course_id = course_id.trim();
        let instructor_email = instructor_email.trim();

        if input.is_empty() {
            return Err(AppError::InvalidParameters(format!(
                "nothing to update for instructor permission {instructor_email}, {course_id}"
            )));
        }

        let updated = self
            .repository
            .update(course_id, instructor_email, input)
            .await?;

        info!(
            course_id = %updated.course_id(),
            instructor_email = %updated.instructor_email(),
            role = %updated.role(),
            "instructor permission updated"
        );

        Ok(updated)
    }

    /// Removes an instructor's permission in a course.
    ///
    /// Returns `false` when there was nothing to remove.
    pub async fn delete_instructor_permission(
        &self,
        course_id: &str,
        instructor_email: &str,
    ) -> AppResult<bool> {
        let removed = self
            .repository
            .delete(course_id.trim(), instructor_email.trim())
            .await?;

        if removed {
            info!(course_id, instructor_email, "instructor permission deleted");
        }

        Ok(removed)
    }

    /// Removes every instructor permission of a course.
    pub async fn delete_instructor_permissions_for_course(&self, course_id: &str) -> AppResult<u64> {
        let removed = self.repository.delete_by_course(course_id.trim()).await?;
        info!(course_id, removed, "instructor permissions deleted for course");
        Ok(removed)
    }
}
