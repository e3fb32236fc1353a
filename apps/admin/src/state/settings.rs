//! # Settings State
//!
//! Runtime settings shared by every command: theme, currency and the active
//! business.
//!
//! ## Change Notification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  settings.set_business(..)                                             │
//! │       │                                                                 │
//! │       ├── write lock, replace value, release                           │
//! │       │                                                                 │
//! │       └── broadcast SettingsEvent::BusinessChanged(..)                 │
//! │                 │                                                       │
//! │        ┌────────┴─────────┬──────────────────┐                         │
//! │        ▼                  ▼                  ▼                          │
//! │   product list       report cache       currency display               │
//! │   (subscriber)       (subscriber)       (subscriber)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Subscribers that fall more than [`EVENT_CAPACITY`] events behind receive
//! `RecvError::Lagged` and should re-read [`SettingsState::current`].

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::config::AdminConfig;

/// Buffered events per subscriber.
pub const EVENT_CAPACITY: usize = 32;

/// UI colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Currency used to display amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySettings {
    /// ISO 4217 code
    pub code: String,
    pub symbol: String,
    /// Decimal places shown
    pub decimals: u8,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

/// The business the admin is currently working on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Pre-filled location on new adjustments and transfers.
    pub default_location: Option<String>,
}

/// Snapshot of all settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub currency: CurrencySettings,
    pub business: BusinessSettings,
}

impl Settings {
    /// Initial settings derived from startup configuration.
    pub fn from_config(config: &AdminConfig) -> Self {
        Settings {
            theme: Theme::default(),
            currency: CurrencySettings {
                code: config.currency_code.clone(),
                symbol: config.currency_symbol.clone(),
                decimals: 2,
            },
            business: BusinessSettings {
                id: config.business_id.clone(),
                ..BusinessSettings::default()
            },
        }
    }
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SettingsEvent {
    ThemeChanged(Theme),
    CurrencyChanged(CurrencySettings),
    BusinessChanged(BusinessSettings),
}

/// Shared settings with change broadcast.
#[derive(Debug)]
pub struct SettingsState {
    settings: RwLock<Settings>,
    events: broadcast::Sender<SettingsEvent>,
}

impl SettingsState {
    pub fn new(settings: Settings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SettingsState {
            settings: RwLock::new(settings),
            events,
        }
    }

    /// Copy of the current settings.
    pub async fn current(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Id of the active business, if one is selected.
    pub async fn active_business_id(&self) -> Option<String> {
        self.settings.read().await.business.id.clone()
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.events.subscribe()
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.settings.write().await.theme = theme;
        self.publish(SettingsEvent::ThemeChanged(theme));
    }

    pub async fn set_currency(&self, currency: CurrencySettings) {
        self.settings.write().await.currency = currency.clone();
        self.publish(SettingsEvent::CurrencyChanged(currency));
    }

    pub async fn set_business(&self, business: BusinessSettings) {
        self.settings.write().await.business = business.clone();
        self.publish(SettingsEvent::BusinessChanged(business));
    }

    /// Formats a cent amount in the current currency.
    ///
    /// ## Example
    /// ```rust,ignore
    /// assert_eq!(settings.format_amount(-1234).await, "-$12.34");
    /// ```
    pub async fn format_amount(&self, cents: i64) -> String {
        let currency = self.settings.read().await.currency.clone();
        format_amount(&currency, cents)
    }

    fn publish(&self, event: SettingsEvent) {
        // Sending only fails when nobody is subscribed
        match self.events.send(event) {
            Ok(receivers) => debug!(receivers = receivers, "Settings change published"),
            Err(_) => debug!("Settings changed with no subscribers"),
        }
    }
}

fn format_amount(currency: &CurrencySettings, cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    if currency.decimals == 0 {
        return format!("{}{}{}", sign, currency.symbol, cents / 100);
    }

    // Amounts are stored in cents; more than two places just pads
    let decimals = currency.decimals as usize;
    let whole = cents / 100;
    let frac = format!("{:02}", cents % 100);
    format!(
        "{}{}{}.{:0<width$}",
        sign,
        currency.symbol,
        whole,
        frac,
        width = decimals
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_updates_are_broadcast() {
        let state = SettingsState::new(Settings::default());
        let mut rx = state.subscribe();

        let business = BusinessSettings {
            id: Some("biz-1".to_string()),
            name: Some("Corner Shop".to_string()),
            default_location: None,
        };
        state.set_business(business.clone()).await;
        state.set_theme(Theme::Dark).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            SettingsEvent::BusinessChanged(business)
        );
        assert_eq!(rx.recv().await.unwrap(), SettingsEvent::ThemeChanged(Theme::Dark));

        assert_eq!(state.active_business_id().await.as_deref(), Some("biz-1"));
        assert_eq!(state.current().await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_update_without_subscribers() {
        let state = SettingsState::new(Settings::default());
        state.set_theme(Theme::Light).await;
        assert_eq!(state.current().await.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let state = SettingsState::new(Settings::default());
        state.set_theme(Theme::Dark).await;

        let mut rx = state.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AdminConfig::for_path(":memory:");
        config.business_id = Some("biz-9".to_string());
        config.currency_code = "EUR".to_string();
        config.currency_symbol = "€".to_string();

        let settings = Settings::from_config(&config);
        assert_eq!(settings.business.id.as_deref(), Some("biz-9"));
        assert_eq!(settings.currency.code, "EUR");
        assert_eq!(settings.theme, Theme::System);
    }

    #[test]
    fn test_format_amount() {
        let usd = CurrencySettings::default();
        assert_eq!(format_amount(&usd, 1234), "$12.34");
        assert_eq!(format_amount(&usd, 5), "$0.05");
        assert_eq!(format_amount(&usd, -1234), "-$12.34");

        let yen = CurrencySettings {
            code: "JPY".to_string(),
            symbol: "¥".to_string(),
            decimals: 0,
        };
        assert_eq!(format_amount(&yen, 150_000), "¥1500");
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(SettingsEvent::ThemeChanged(Theme::Dark)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "themeChanged", "value": "dark" }));
    }
}
