//! Database connection pool
//!
//! Creates the SQLite connection pool from configuration. File-based
//! databases get their parent directory created and are opened with
//! `mode=rwc` so a fresh deployment bootstraps itself.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Create a SQLite connection pool based on configuration.
///
/// # Errors
///
/// Returns an error if the database directory cannot be created or the
/// connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let url = config.url.as_str();

    // Ensure the database directory exists for file-based SQLite
    if !url.starts_with(":memory:") && !url.starts_with("sqlite::memory:") {
        let path = if url.starts_with("sqlite:") {
            url.trim_start_matches("sqlite:")
        } else {
            url
        };

        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
            }
        }
    }

    // Build the connection URL with create mode for file-based databases
    let connection_url = if url.starts_with("sqlite:") {
        // If it already has options, don't modify
        if url.contains('?') {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", url)
    };

    // Every pooled connection to an in-memory database would be its own
    // empty database, so those pools are capped at a single connection
    let max_connections = if connection_url.contains(":memory:") {
        1
    } else {
        20
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&connection_url)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

    // Enable foreign keys for SQLite
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}

/// Create an in-memory database pool for testing
pub async fn create_test_pool() -> Result<SqlitePool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}
