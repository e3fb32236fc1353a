//! # stockpile-db: Document Store for Stockpile Admin
//!
//! A small document store on top of SQLite, plus the inventory services that
//! run on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin command (add_stock_adjustment)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockpile-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   Repositories ───► Transaction ───► Collection ───► Document   │   │
//! │  │   (services)        (optimistic)     (single doc)    (Value)    │   │
//! │  │                                                        │        │   │
//! │  │                                            sanitize ◄──┘        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite `documents` table: (collection, id) → JSON body + version      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool and the [`Database`] handle
//! - [`migrations`] - Embedded migrations
//! - [`value`] - Tagged field values and the stored JSON codec
//! - [`sanitize`] - Timestamp → ISO string conversion for clients
//! - [`document`] - Stored documents and typed decoding
//! - [`collection`] - Single-document operations
//! - [`transaction`] - Optimistic multi-document transactions
//! - [`repository`] - Products, stock adjustments, stock transfers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockpile_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockpile.db")).await?;
//! let adjustment = db.stock_adjustments().add(input, Some("biz-1")).await?;
//! ```

pub mod collection;
pub mod document;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sanitize;
pub mod transaction;
pub mod value;

pub use collection::Collection;
pub use document::Document;
pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, IN_MEMORY_PATH};
pub use sanitize::sanitize;
pub use transaction::Transaction;
pub use value::{Fields, Value};

pub use repository::product::ProductRepository;
pub use repository::stock_adjustment::StockAdjustmentRepository;
pub use repository::stock_transfer::StockTransferRepository;
