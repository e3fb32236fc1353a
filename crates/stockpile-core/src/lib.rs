//! # stockpile-core: Pure Business Logic for Stockpile Admin
//!
//! Domain types and inventory math with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stockpile Admin Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin UI (pages, forms)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockpile-admin (context, settings, commands)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockpile-core (THIS CRATE) ★                     │   │
//! │  │   types • money • inventory math • validation • errors         │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockpile-db (document store + transactions)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, StockAdjustment, StockTransfer, line items
//! - [`money`] - Money type with integer arithmetic
//! - [`inventory`] - Totals, per-product deltas, reference numbers
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust
//! use stockpile_core::inventory::{aggregate_deltas, line_items_total};
//! use stockpile_core::StockLineItem;
//!
//! let items = vec![StockLineItem {
//!     product_id: "P1".into(),
//!     quantity: -5.0,
//!     unit_price_cents: 1000,
//! }];
//!
//! assert_eq!(line_items_total(&items).unwrap().cents(), 5000);
//! assert_eq!(aggregate_deltas(&items).unwrap()["P1"], -5.0);
//! ```

pub mod error;
pub mod inventory;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of lines on a single adjustment or transfer.
///
/// Each line is one read and one write inside the store transaction, so this
/// also bounds transaction size.
pub const MAX_LINE_ITEMS: usize = 500;
