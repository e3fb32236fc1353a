//! # Database Pool Management
//!
//! Connection pool creation and configuration for the SQLite-backed
//! document store.
//!
//! ## Startup
//! ```text
//! AdminConfig (admin app)
//!      │
//!      ▼
//! DbConfig::new(path)            pool settings
//!      │
//!      ▼
//! Database::new(config).await    pool + embedded migrations
//!      │
//!      ├── db.collection("...")  raw document access
//!      ├── db.transaction()      optimistic multi-document writes
//!      └── db.products() / db.stock_adjustments() / db.stock_transfers()
//! ```
//!
//! WAL mode is enabled so readers never wait on the writer.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::product::ProductRepository;
use crate::repository::stock_adjustment::StockAdjustmentRepository;
use crate::repository::stock_transfer::StockTransferRepository;
use crate::transaction::Transaction;

/// Database path SQLite treats as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/stockpile.db")
///     .max_connections(5)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections. Default: 5
    pub max_connections: u32,

    /// Connections kept alive while idle. Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle time before a connection is closed. Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long SQLite waits on a locked database before failing a write.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the database file at `path`. The file is
    /// created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory database for tests. Every `Database` built from it is
    /// isolated. Any config whose path is `:memory:` gets a single
    /// connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(1),
            run_migrations: true,
        }
    }

    /// True for the `:memory:` path.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle on the document store. Cheap to clone; clones share the pool.
///
/// Constructed once at startup and handed to whatever needs it. There is no
/// global instance.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    ///
    /// ## Errors
    /// - `DbError::ConnectionFailed` if the file cannot be opened
    /// - `DbError::MigrationFailed` if a migration fails
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let mut connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        // In-memory databases cannot use WAL
        if !config.is_in_memory() {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.connect_timeout);

        // The in-memory database lives exactly as long as its one connection
        let max_connections = if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            1
        } else {
            pool_options = pool_options
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .idle_timeout(Some(config.idle_timeout));
            config.max_connections
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Embedded vs applied migration counts.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// The underlying pool, for diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Handle on a named collection.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(self.pool.clone(), name)
    }

    /// Starts an optimistic transaction.
    pub fn transaction(&self) -> Transaction {
        Transaction::new(self.pool.clone())
    }

    /// Product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Stock adjustment service.
    pub fn stock_adjustments(&self) -> StockAdjustmentRepository {
        StockAdjustmentRepository::new(self.clone())
    }

    /// Stock transfer service.
    pub fn stock_transfers(&self) -> StockTransferRepository {
        StockTransferRepository::new(self.clone())
    }

    /// Closes the pool. Every later operation fails.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
