use std::env;

use tracing_subscriber::EnvFilter;
use tutorium_core::{AppError, AppResult};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl AdminConfig {
    pub fn load() -> AppResult<Self> {
        let database_url = required_non_empty_env("DATABASE_URL")?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => parse_max_connections(value.as_str())?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_max_connections(value: &str) -> AppResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(AppError::InvalidParameters(format!(
            "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{value}'"
        ))),
    }
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value =
        env::var(name).map_err(|_| AppError::InvalidParameters(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::InvalidParameters(format!(
            "{name} must not be empty"
        )));
    }

    Ok(value)
}
