//! # Database Migrations
//!
//! Embedded SQL migrations for the document store.
//!
//! ```text
//! Startup ──► _sqlx_migrations present? ──► apply pending files in order
//!                                            001_documents.sql ✓
//!                                            002_...           (new)
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Use `IF NOT EXISTS` where possible
//! 3. Never edit an applied migration; add a new one

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::DbResult;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Embedded vs applied migration counts, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub total: usize,
    pub applied: usize,
}

impl MigrationStatus {
    /// True when nothing is pending.
    pub fn is_current(&self) -> bool {
        self.applied >= self.total
    }
}

/// Runs all pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(
        embedded = MIGRATOR.migrations.len(),
        "Checking for pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Reports how many embedded migrations have been applied.
///
/// A database that has never been migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Migration table not readable");
            0
        }
    };

    Ok(MigrationStatus {
        total,
        applied: applied.max(0) as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_unmigrated_database_reports_pending() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
        assert!(migration_status(db.pool()).await.unwrap().is_current());
    }
}
