//! Database layer
//!
//! SQLite via sqlx, targeting single-binary deployment. Migrations are
//! embedded in code and applied at startup.
//!
//! # Usage
//!
//! ```ignore
//! use vitrine::config::DatabaseConfig;
//! use vitrine::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
