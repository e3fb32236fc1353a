//! # Commands Module
//!
//! Everything the admin UI calls.
//!
//! ```text
//! commands/
//! ├── product.rs           create_product, get_product_by_id, list_products
//! ├── stock_adjustment.rs  add / get_all / get / delete
//! ├── stock_transfer.rs    add / get_all / get / delete
//! └── settings.rs          get_settings, set_active_business, set_theme
//! ```
//!
//! Every command takes `&AppContext` first, returns `ApiResult<T>` and logs
//! its duration. Commands that list or create business-scoped records fall
//! back to the active business when the caller passes no `business_id`.

pub mod product;
pub mod settings;
pub mod stock_adjustment;
pub mod stock_transfer;

use std::time::Instant;

/// Milliseconds since `start`, as logged by every command.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
