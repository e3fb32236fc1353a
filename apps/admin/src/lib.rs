//! # Stockpile Admin
//!
//! Admin backend for the Stockpile POS: product catalog, stock adjustments,
//! stock transfers and live settings.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Admin Startup                                   │
//! │                                                                         │
//! │  1. init_tracing()            RUST_LOG or the default filter           │
//! │  2. AdminConfig::from_env()   STOCKPILE_* variables, data dir          │
//! │  3. AppContext::open(config)  pool + migrations + settings             │
//! │  4. commands::*               called by the UI with &AppContext        │
//! │  5. ctx.shutdown()            closes the pool                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

pub use config::{AdminConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{AppContext, Settings, SettingsEvent, SettingsState};

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Honors `RUST_LOG`; otherwise logs `info` with debug output for our own
/// crates. A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockpile=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
