//! Collaborator stand-ins for tests in this crate and its dependents.
//!
//! Enabled by the `test-support` feature.

use std::sync::Mutex;

use async_trait::async_trait;
use uniteller_sdk::config::ProviderSettings;

use crate::errors::PaymentError;
use crate::services::StatusSource;

/// Canned status-query answers that record every queried order id.
pub struct StubStatuses {
    pub response: Result<Vec<String>, String>,
    pub queries: Mutex<Vec<String>>,
}

impl StubStatuses {
    pub fn reporting(statuses: &[&str]) -> Self {
        Self {
            response: Ok(statuses.iter().map(|s| s.to_string()).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query fails with `ProviderUnavailable(reason)`.
    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_owned()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queried(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn query_count(&self) -> usize {
        self.queried().len()
    }
}

#[async_trait]
impl StatusSource for StubStatuses {
    async fn query_statuses(
        &self,
        _settings: &ProviderSettings,
        order_id: &str,
    ) -> Result<Vec<String>, PaymentError> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(order_id.to_owned());
        self.response
            .clone()
            .map_err(PaymentError::ProviderUnavailable)
    }
}
