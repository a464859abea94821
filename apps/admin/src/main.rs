//! Tutorium instructor permission administration tool.

#![forbid(unsafe_code)]

mod admin_command;
mod admin_config;

use std::env;
use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tutorium_application::InstructorPermissionService;
use tutorium_core::{AppError, AppResult};
use tutorium_infrastructure::{PostgresInstructorPermissionRepository, run_migrations};

use crate::admin_command::AdminCommand;
use crate::admin_config::{AdminConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = AdminCommand::parse(&args)?;
    let config = AdminConfig::load()?;
    let pool = connect_pool(&config).await?;

    if command == AdminCommand::Migrate {
        run_migrations(&pool).await?;
    }

    info!(
        max_connections = config.max_connections,
        "tutorium-admin connected"
    );

    let service =
        InstructorPermissionService::new(Arc::new(PostgresInstructorPermissionRepository::new(pool)));
    let output = command.execute(&service).await?;
    println!("{output}");

    Ok(())
}

async fn connect_pool(config: &AdminConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}
