// engine/config.rs — User-facing settings and their TOML loading.
//
// Every section carries `#[serde(default)]`, so a partial file (or an empty
// one) fills the gaps from `Default`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atoms::constants::{
    DEFAULT_NOTIFICATION_COUNT, DEFAULT_WINDOW_END, DEFAULT_WINDOW_START,
    MAX_NOTIFICATIONS_PER_DAY,
};
use crate::atoms::error::{QuoteError, QuoteResult};
use crate::atoms::types::{TimePoint, TimeWindow};

/// When and how often quote notifications fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub start: TimePoint,
    pub end: TimePoint,
    /// Requested count; clamped at distribution time.
    pub count: i32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            start: DEFAULT_WINDOW_START.parse().unwrap_or(TimePoint { hour: 9, minute: 0 }),
            end: DEFAULT_WINDOW_END.parse().unwrap_or(TimePoint { hour: 21, minute: 0 }),
            count: DEFAULT_NOTIFICATION_COUNT,
        }
    }
}

impl NotificationSettings {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::between(self.start, self.end)
    }
}

/// How the quote bag is assembled from the pool source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Whether active personal quotes join the rotation.
    pub include_personal: bool,
    /// Multiplier applied to personal quote weights.
    pub personal_frequency: f64,
    /// Base weight of every builtin quote.
    pub builtin_weight: f64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { include_personal: true, personal_frequency: 1.0, builtin_weight: 1.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub notifications: NotificationSettings,
    pub pool: PoolSettings,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> QuoteResult<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("[config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> QuoteResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Weights must be usable; the notification count is clamped later so
    /// only obviously wrong values are rejected here.
    pub fn validate(&self) -> QuoteResult<()> {
        for (name, w) in [
            ("pool.personal_frequency", self.pool.personal_frequency),
            ("pool.builtin_weight", self.pool.builtin_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(QuoteError::Config(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }
        if self.notifications.count > MAX_NOTIFICATIONS_PER_DAY * 10 {
            return Err(QuoteError::Config(format!(
                "notifications.count {} is unreasonably large",
                self.notifications.count
            )));
        }
        Ok(())
    }
}
