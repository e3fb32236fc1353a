//! # Admin Configuration
//!
//! Startup configuration for the admin backend.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKPILE_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read once; anything that changes at runtime lives in
//! [`SettingsState`](crate::state::SettingsState).

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "stockpile.db";

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no home/data directory to put the database in.
    #[error("Could not determine app data directory")]
    NoDataDir,

    /// An environment variable is set but unusable.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidVar { name: String, value: String },

    /// The data directory could not be created.
    #[error("Could not create data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Admin backend configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// Business selected at startup; commands fall back to it when the
    /// caller passes no business scope.
    pub business_id: Option<String>,

    /// ISO 4217 code. Default: USD
    pub currency_code: String,

    /// Display symbol. Default: $
    pub currency_symbol: String,
}

impl AdminConfig {
    /// Configuration for a database at `path`, everything else default.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        AdminConfig {
            database_path: path.into(),
            max_connections: 5,
            business_id: None,
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
        }
    }

    /// Builds the configuration from the environment.
    ///
    /// ## Environment Variables
    /// - `STOCKPILE_DB_PATH`: database file (default: platform data dir)
    /// - `STOCKPILE_DB_MAX_CONNECTIONS`: pool size
    /// - `STOCKPILE_BUSINESS_ID`: active business at startup
    /// - `STOCKPILE_CURRENCY_CODE`, `STOCKPILE_CURRENCY_SYMBOL`
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env_var("STOCKPILE_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let mut config = AdminConfig::for_path(database_path);

        if let Some(raw) = env_var("STOCKPILE_DB_MAX_CONNECTIONS") {
            config.max_connections = parse_connections(&raw)?;
        }

        config.business_id = env_var("STOCKPILE_BUSINESS_ID");

        if let Some(code) = env_var("STOCKPILE_CURRENCY_CODE") {
            config.currency_code = code.to_uppercase();
        }

        if let Some(symbol) = env_var("STOCKPILE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        Ok(config)
    }
}

/// Platform data directory path for the database, created if missing.
///
/// - **macOS**: `~/Library/Application Support/com.stockpile.admin/stockpile.db`
/// - **Windows**: `%APPDATA%\stockpile\admin\data\stockpile.db`
/// - **Linux**: `~/.local/share/admin/stockpile.db`
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "stockpile", "admin").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.join(DATABASE_FILE))
}

/// Non-blank environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_connections(raw: &str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidVar {
            name: "STOCKPILE_DB_MAX_CONNECTIONS".to_string(),
            value: raw.to_string(),
        }),
    }
}
