use super::*;

use tracing::debug;
use tutorium_core::AppResult;
use tutorium_domain::{InstructorPermission, Privilege, PrivilegeTarget};

impl InstructorPermissionService {
    /// Returns the permission of one instructor in one course, if any.
    pub async fn get_instructor_permission_for_email(
        &self,
        course_id: &str,
        instructor_email: &str,
    ) -> AppResult<Option<InstructorPermission>> {
        self.repository
            .find_one(course_id.trim(), instructor_email.trim())
            .await
    }

    /// Returns all permissions held by an instructor, in storage order.
    pub async fn get_instructor_permissions_for_email(
        &self,
        instructor_email: &str,
    ) -> AppResult<Vec<InstructorPermission>> {
        let permissions = self
            .repository
            .find_by_email(instructor_email.trim())
            .await?;
        debug!(
            instructor_email,
            count = permissions.len(),
            "listed instructor permissions for email"
        );
        Ok(permissions)
    }

    /// Returns all instructor permissions of a course, in storage order.
    pub async fn get_instructor_permissions_for_course(
        &self,
        course_id: &str,
    ) -> AppResult<Vec<InstructorPermission>> {
        let permissions = self.repository.find_by_course(course_id.trim()).await?;
        debug!(
            course_id,
            count = permissions.len(),
            "listed instructor permissions for course"
        );
        Ok(permissions)
    }

    /// Returns whether an instructor holds a privilege at the given target.
    ///
    /// Instructors without a permission record in the course hold nothing.
    pub async fn is_instructor_allowed(
        &self,
        course_id: &str,
        instructor_email: &str,
        privilege: Privilege,
        target: &PrivilegeTarget,
    ) -> AppResult<bool> {
        Ok(self
            .get_instructor_permission_for_email(course_id, instructor_email)
            .await?
            .is_some_and(|permission| permission.privileges().is_allowed(privilege, target)))
    }
}
