//! # State Module
//!
//! The application context every command receives.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup                                                               │
//! │    AdminConfig::from_env()                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    AppContext::open(config).await                                      │
//! │         │                                                               │
//! │   ┌─────┴────────────────────────────────────────────────┐             │
//! │   │ AppContext (Clone, shared by reference)              │             │
//! │   │  ├── Database        pool, repositories              │             │
//! │   │  ├── SettingsState   RwLock + broadcast              │             │
//! │   │  └── AdminConfig     read-only                       │             │
//! │   └──────────────────────────────────────────────────────┘             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    commands::stock_adjustment::add_stock_adjustment(&ctx, ..)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no process-wide singletons: tests build their own context over
//! an in-memory database.

mod settings;

pub use settings::{
    BusinessSettings, CurrencySettings, Settings, SettingsEvent, SettingsState, Theme,
    EVENT_CAPACITY,
};

use std::sync::Arc;

use stockpile_db::{Database, DbConfig, DbResult, IN_MEMORY_PATH};
use tracing::info;

use crate::config::AdminConfig;

/// Everything a command needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppContext {
    db: Database,
    settings: Arc<SettingsState>,
    config: Arc<AdminConfig>,
}

impl AppContext {
    /// Builds a context over an already opened database.
    pub fn new(db: Database, config: AdminConfig) -> Self {
        let settings = SettingsState::new(Settings::from_config(&config));
        AppContext {
            db,
            settings: Arc::new(settings),
            config: Arc::new(config),
        }
    }

    /// Opens the configured database (running migrations) and builds the
    /// context.
    pub async fn open(config: AdminConfig) -> DbResult<Self> {
        let db_config = if config.database_path.as_os_str() == IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(config.database_path.clone()).max_connections(config.max_connections)
        };
        let db = Database::new(db_config).await?;

        info!(
            path = %config.database_path.display(),
            business_id = ?config.business_id,
            "Admin context ready"
        );

        Ok(AppContext::new(db, config))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// The caller's business scope, or the active business when the caller
    /// passed none.
    pub async fn business_scope(&self, requested: Option<String>) -> Option<String> {
        match requested {
            Some(id) if !id.trim().is_empty() => Some(id),
            _ => self.settings.active_business_id().await,
        }
    }

    /// Closes the database pool.
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Context over a fresh in-memory database with `biz-1` active.
    pub async fn context() -> AppContext {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = AdminConfig::for_path(":memory:");
        config.business_id = Some("biz-1".to_string());
        AppContext::new(db, config)
    }

    /// Inserts a `biz-1` product with the given stock.
    pub async fn product(ctx: &AppContext, name: &str, stock: f64) -> stockpile_core::Product {
        ctx.db()
            .products()
            .insert(&stockpile_core::NewProduct {
                business_id: Some("biz-1".to_string()),
                name: name.to_string(),
                category: None,
                stock,
                purchase_price_cents: 700,
                selling_price_cents: 1000,
            })
            .await
            .unwrap()
    }
}
