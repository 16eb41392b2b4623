//! Authentication policy configuration.

use serde::{Deserialize, Serialize};

/// Authentication and registration policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether self-service registration is open. When disabled, the
    /// register flow rejects before touching the credential store.
    #[serde(default = "default_true")]
    pub registration_enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            registration_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}
