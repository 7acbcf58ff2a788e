//! Application configuration.
//!
//! File-backed values load with priority: config.toml > .env / environment
//! variables > defaults. Server constants stay compile-time.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;
use crate::srs::SelectionPolicy;

// ==================== Configuration file ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    srs: Option<SrsConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SrsConfig {
    /// "random" (reference behavior) or "overdue"
    policy: Option<String>,
}

fn read_config_file() -> Option<AppConfig> {
    let contents = std::fs::read_to_string("config.toml").ok()?;
    match toml::from_str(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed config.toml: {}", e);
            None
        }
    }
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    if let Some(path) = read_config_file()
        .and_then(|c| c.database)
        .and_then(|db| db.path)
    {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load the due-card selection policy: config.toml > SRS_POLICY > default
pub fn load_selection_policy() -> SelectionPolicy {
    let configured = read_config_file()
        .and_then(|c| c.srs)
        .and_then(|s| s.policy)
        .or_else(|| std::env::var("SRS_POLICY").ok());

    match configured {
        Some(name) => match SelectionPolicy::from_str(&name) {
            Some(policy) => policy,
            None => {
                tracing::warn!("Unknown SRS policy {:?}, using default", name);
                SelectionPolicy::default()
            }
        },
        None => SelectionPolicy::default(),
    }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Lesson Configuration ====================

/// Minimum exercise score (percent) for a lesson to count as completed
pub const LESSON_PASS_PERCENT: i64 = 50;
