//! # Settings Commands

use tracing::info;

use crate::error::ApiResult;
use crate::state::{AppContext, BusinessSettings, Settings, Theme};

/// Current settings snapshot.
pub async fn get_settings(ctx: &AppContext) -> ApiResult<Settings> {
    Ok(ctx.settings().current().await)
}

/// Switches the active business. Subscribers get `BusinessChanged`.
pub async fn set_active_business(ctx: &AppContext, business: BusinessSettings) -> ApiResult<()> {
    info!(business_id = ?business.id, "set_active_business command");
    ctx.settings().set_business(business).await;
    Ok(())
}

/// Changes the UI theme.
pub async fn set_theme(ctx: &AppContext, theme: Theme) -> ApiResult<()> {
    ctx.settings().set_theme(theme).await;
    Ok(())
}
