//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed session TTL in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    /// Name of the transport cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the periodic expired-session sweep runs. Lazy deletion
    /// during validation is the correctness mechanism; the sweep is
    /// storage hygiene.
    #[serde(default = "default_true")]
    pub sweep_enabled: bool,
    /// Interval between sweep runs, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            cookie_name: default_cookie_name(),
            sweep_enabled: true,
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_ttl_days() -> u64 {
    7
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
