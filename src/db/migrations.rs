//! Database migrations module
//!
//! Code-based migrations for the Vitrine portfolio system. All migrations
//! are embedded as SQL strings for single-binary deployment. Applied
//! versions are tracked in a `_migrations` table.
//!
//! # Usage
//!
//! ```ignore
//! use vitrine::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name/description
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the Vitrine portfolio system.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_projects",
        up: r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                description TEXT NOT NULL,
                thumbnail_url VARCHAR(500),
                live_url VARCHAR(500),
                github_url VARCHAR(500),
                featured INTEGER NOT NULL DEFAULT 0,
                published INTEGER NOT NULL DEFAULT 0,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_projects_slug ON projects(slug);
            CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured);
        "#,
    },
    Migration {
        version: 2,
        name: "create_techs",
        up: r#"
            CREATE TABLE IF NOT EXISTS techs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS project_techs (
                project_id INTEGER NOT NULL,
                tech_id INTEGER NOT NULL,
                PRIMARY KEY (project_id, tech_id),
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                FOREIGN KEY (tech_id) REFERENCES techs(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_project_techs_tech ON project_techs(tech_id);
        "#,
    },
    Migration {
        version: 3,
        name: "create_posts",
        up: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                excerpt TEXT NOT NULL,
                content TEXT NOT NULL,
                cover_url VARCHAR(500),
                reading_time INTEGER NOT NULL DEFAULT 1,
                published INTEGER NOT NULL DEFAULT 0,
                published_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_posts_slug ON posts(slug);
            CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published);
        "#,
    },
    Migration {
        version: 4,
        name: "create_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL,
                slug VARCHAR(100) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS post_tags (
                post_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (post_id, tag_id),
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON post_tags(tag_id);
        "#,
    },
    Migration {
        version: 5,
        name: "create_experiences",
        up: r#"
            CREATE TABLE IF NOT EXISTS experiences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company VARCHAR(255) NOT NULL,
                role VARCHAR(255) NOT NULL,
                description TEXT,
                logo_url VARCHAR(500),
                start_date DATE NOT NULL,
                end_date DATE,
                current INTEGER NOT NULL DEFAULT 0,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_experiences_start ON experiences(start_date);
        "#,
    },
    Migration {
        version: 6,
        name: "create_skills",
        up: r#"
            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL,
                category VARCHAR(100) NOT NULL,
                icon_url VARCHAR(500),
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (name, category)
            );
            CREATE INDEX IF NOT EXISTS idx_skills_category ON skills(category);
        "#,
    },
];

/// Run all pending migrations.
///
/// Creates the tracking table if needed, then applies any migration whose
/// version is not yet recorded, in order.
///
/// # Returns
///
/// Number of migrations applied
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Migration SQL may contain multiple statements
    for statement in split_sql_statements(migration.up) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.chars().count() > 100 {
        let prefix: String = sql.chars().take(100).collect();
        format!("{}...", prefix)
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_migration_versions_unique_and_ordered() {
        let mut last = 0;
        for migration in MIGRATIONS {
            assert!(
                migration.version > last,
                "migration versions must be strictly increasing, got {} after {}",
                migration.version,
                last
            );
            last = migration.version;
        }
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INTEGER);\nCREATE INDEX i ON a(id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert!(statements[1].starts_with("CREATE INDEX"));
    }

    #[test]
    fn test_truncate_sql_handles_multibyte_text() {
        let short = "SELECT 'héllo'";
        assert_eq!(truncate_sql(short), short);

        // A multibyte character straddling the cutoff must not panic
        let long = format!("{}é{}", "x".repeat(99), "y".repeat(50));
        let truncated = truncate_sql(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 103);
    }

    #[tokio::test]
    async fn test_run_migrations_fresh_database() {
        let pool = create_test_pool().await.unwrap();

        let count = run_migrations(&pool).await.unwrap();
        assert_eq!(count, MIGRATIONS.len());

        // All entity tables should exist
        for table in ["projects", "posts", "experiences", "skills", "tags", "techs"] {
            let row: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(row.0, 1, "table {} should exist", table);
        }
    }

    #[tokio::test]
    async fn test_run_migrations_idempotent() {
        let pool = create_test_pool().await.unwrap();

        let first = run_migrations(&pool).await.unwrap();
        assert_eq!(first, MIGRATIONS.len());

        let second = run_migrations(&pool).await.unwrap();
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn test_migrations_recorded() {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied = get_applied_migrations(&pool).await.unwrap();
        assert_eq!(applied.len(), MIGRATIONS.len());
        assert_eq!(applied[0].version, 1);
        assert_eq!(applied[0].name, "create_projects");
    }
}
