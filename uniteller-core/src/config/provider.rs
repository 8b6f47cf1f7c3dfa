use std::time::Duration;

use uniteller_sdk::client::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use uniteller_sdk::config::ProviderEndpoints;

/// Uniteller endpoints and the status-query policy.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoints: ProviderEndpoints,
    /// Per-attempt timeout of the status query.
    pub timeout: Duration,
    /// Status-query attempts before giving up.
    pub max_attempts: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoints: ProviderEndpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
