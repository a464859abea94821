use async_trait::async_trait;
use tokio::sync::RwLock;

use tutorium_application::{
    InstructorPermissionRepository, UpdateInstructorPermissionInput, permission_already_exists,
    permission_not_found,
};
use tutorium_core::AppResult;
use tutorium_domain::InstructorPermission;


/// In-memory instructor permission repository.
///
/// Records are kept in insertion order. The uniqueness check and the insert
/// happen under one write guard, as do the read and write of an update.
#[derive(Debug, Default)]
pub struct InMemoryInstructorPermissionRepository {
    records: RwLock<Vec<InstructorPermission>>,
}

impl InMemoryInstructorPermissionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InstructorPermissionRepository for InMemoryInstructorPermissionRepository {
    async fn create(&self, permission: InstructorPermission) -> AppResult<InstructorPermission> {
        let mut records = self.records.write().await;

        if records.iter().any(|stored| {
            stored.matches(
                permission.course_id().as_str(),
                permission.instructor_email().as_str(),
            )
        }) {
            return Err(permission_already_exists(&permission.key()));
        }

        records.push(permission.clone());
        Ok(permission)
    }

    async fn find_by_email(&self, instructor_email: &str) -> AppResult<Vec<InstructorPermission>> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|stored| stored.instructor_email().as_str() == instructor_email)
            .cloned()
            .collect())
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<InstructorPermission>> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|stored| stored.course_id().as_str() == course_id)
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        course_id: &str,
        instructor_email: &str,
    ) -> AppResult<Option<InstructorPermission>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|stored| stored.matches(course_id, instructor_email))
            .cloned())
    }

    async fn update(
        &self,
        course_id: &str,
        instructor_email: &str,
        input: UpdateInstructorPermissionInput,
    ) -> AppResult<InstructorPermission> {
        let mut records = self.records.write().await;

        let Some(stored) = records
            .iter_mut()
            .find(|stored| stored.matches(course_id, instructor_email))
        else {
            return Err(permission_not_found(course_id, instructor_email));
        };

        *stored = input.apply_to(stored.clone());
        Ok(stored.clone())
    }

    async fn delete(&self, course_id: &str, instructor_email: &str) -> AppResult<bool> {
        let mut records = self.records.write().await;

        let Some(position) = records
            .iter()
            .position(|stored| stored.matches(course_id, instructor_email))
        else {
            return Ok(false);
        };

        records.remove(position);
        Ok(true)
    }

    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|stored| stored.course_id().as_str() != course_id);

        Ok(u64::try_from(before - records.len()).unwrap_or(u64::MAX))
    }
}
