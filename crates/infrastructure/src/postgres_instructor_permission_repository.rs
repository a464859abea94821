use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use tutorium_application::{
    InstructorPermissionRepository, UpdateInstructorPermissionInput, permission_already_exists,
    permission_not_found,
};
use tutorium_core::{AppError, AppResult};
use tutorium_domain::{InstructorPermission, InstructorPermissionKey, InstructorRole};


/// PostgreSQL-backed repository for instructor permissions.
///
/// Uniqueness is enforced by the `(course_id, instructor_email)` constraint;
/// listings are ordered by insertion id. Updates lock the row while merging.
#[derive(Clone)]
pub struct PostgresInstructorPermissionRepository {
    pool: PgPool,
}

impl PostgresInstructorPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InstructorPermissionRow {
    course_id: String,
    instructor_email: String,
    role: String,
    privileges: Value,
}

impl InstructorPermissionRow {
    fn into_permission(self) -> AppResult<InstructorPermission> {
        let role = InstructorRole::from_str(self.role.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "stored role for {}, {} is invalid: {error}",
                self.instructor_email, self.course_id
            ))
        })?;
        let privileges = serde_json::from_value(self.privileges).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode privileges for {}, {}: {error}",
                self.instructor_email, self.course_id
            ))
        })?;

        InstructorPermission::new(self.course_id, self.instructor_email, role, privileges).map_err(
            |error| AppError::Internal(format!("stored instructor permission is invalid: {error}")),
        )
    }
}

fn encode_privileges(permission: &InstructorPermission) -> AppResult<Value> {
    serde_json::to_value(permission.privileges()).map_err(|error| {
        AppError::Internal(format!(
            "failed to serialize privileges for {}: {error}",
            permission.key()
        ))
    })
}

fn map_create_error(error: sqlx::Error, key: &InstructorPermissionKey) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return permission_already_exists(key);
    }

    AppError::Internal(format!(
        "failed to create instructor permission {key}: {error}"
    ))
}

fn collect_permissions(rows: Vec<InstructorPermissionRow>) -> AppResult<Vec<InstructorPermission>> {
    rows.into_iter()
        .map(InstructorPermissionRow::into_permission)
        .collect()
}

#[async_trait]
impl InstructorPermissionRepository for PostgresInstructorPermissionRepository {
    async fn create(&self, permission: InstructorPermission) -> AppResult<InstructorPermission> {
        let key = permission.key();
        let privileges = encode_privileges(&permission)?;

        let row = sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            INSERT INTO instructor_permissions (course_id, instructor_email, role, privileges)
            VALUES ($1, $2, $3, $4)
            RETURNING course_id, instructor_email, role, privileges
            "#,
        )
        .bind(permission.course_id().as_str())
        .bind(permission.instructor_email().as_str())
        .bind(permission.role().as_str())
        .bind(privileges)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_create_error(error, &key))?;

        row.into_permission()
    }

    async fn find_by_email(&self, instructor_email: &str) -> AppResult<Vec<InstructorPermission>> {
        let rows = sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            SELECT course_id, instructor_email, role, privileges
            FROM instructor_permissions
            WHERE instructor_email = $1
            ORDER BY id
            "#,
        )
        .bind(instructor_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list instructor permissions for '{instructor_email}': {error}"
            ))
        })?;

        collect_permissions(rows)
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<InstructorPermission>> {
        let rows = sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            SELECT course_id, instructor_email, role, privileges
            FROM instructor_permissions
            WHERE course_id = $1
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list instructor permissions for course '{course_id}': {error}"
            ))
        })?;

        collect_permissions(rows)
    }

    async fn find_one(
        &self,
        course_id: &str,
        instructor_email: &str,
    ) -> AppResult<Option<InstructorPermission>> {
        sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            SELECT course_id, instructor_email, role, privileges
            FROM instructor_permissions
            WHERE course_id = $1 AND instructor_email = $2
            LIMIT 1
            "#,
        )
        .bind(course_id)
        .bind(instructor_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?
        .map(InstructorPermissionRow::into_permission)
        .transpose()
    }

    async fn update(
        &self,
        course_id: &str,
        instructor_email: &str,
        input: UpdateInstructorPermissionInput,
    ) -> AppResult<InstructorPermission> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start transaction for instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?;

        let current = sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            SELECT course_id, instructor_email, role, privileges
            FROM instructor_permissions
            WHERE course_id = $1 AND instructor_email = $2
            FOR UPDATE
            "#,
        )
        .bind(course_id)
        .bind(instructor_email)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to lock instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?
        .ok_or_else(|| permission_not_found(course_id, instructor_email))?
        .into_permission()?;

        let next = input.apply_to(current);
        let privileges = encode_privileges(&next)?;

        let row = sqlx::query_as::<_, InstructorPermissionRow>(
            r#"
            UPDATE instructor_permissions
            SET role = $3,
                privileges = $4,
                updated_at = now()
            WHERE course_id = $1 AND instructor_email = $2
            RETURNING course_id, instructor_email, role, privileges
            "#,
        )
        .bind(course_id)
        .bind(instructor_email)
        .bind(next.role().as_str())
        .bind(privileges)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?;

        row.into_permission()
    }

    async fn delete(&self, course_id: &str, instructor_email: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM instructor_permissions
            WHERE course_id = $1 AND instructor_email = $2
            "#,
        )
        .bind(course_id)
        .bind(instructor_email)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete instructor permission {instructor_email}, {course_id}: {error}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_course(&self, course_id: &str) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM instructor_permissions
            WHERE course_id = $1
            "#,
        )
        .bind(course_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete instructor permissions for course '{course_id}': {error}"
            ))
        })?;

        Ok(result.rows_affected())
    }
}
