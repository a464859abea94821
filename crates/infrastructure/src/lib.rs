//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_instructor_permission_repository;
mod postgres_instructor_permission_repository;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;
use tutorium_core::{AppError, AppResult};

pub use in_memory_instructor_permission_repository::InMemoryInstructorPermissionRepository;
pub use postgres_instructor_permission_repository::PostgresInstructorPermissionRepository;

/// Embedded schema migrations for the PostgreSQL adapters.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!(
        migrations = MIGRATOR.iter().count(),
        "database migrations applied"
    );
    Ok(())
}
