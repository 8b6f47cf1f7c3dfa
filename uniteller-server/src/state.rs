//! Application state shared across all request handlers.

use crate::config::ConfigLoader;
use std::sync::Arc;
use uniteller_core::config::SharedConfig;
use uniteller_core::method::{PaymentMethod, UnitellerPaymentMethod};
use uniteller_core::processors::{CallbackProcessor, Reconciler};
use uniteller_core::services::{OrderManagement, StatusSource};

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (sections can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// The host's order management.
    pub orders: Arc<dyn OrderManagement>,
    /// Uniteller status lookups.
    pub status_source: Arc<dyn StatusSource>,
    pub payment_method: Arc<dyn PaymentMethod>,
    /// Used by the admin API to persist settings.
    pub config_loader: Arc<ConfigLoader>,
}

impl AppState {
    pub fn new(
        config: SharedConfig,
        orders: Arc<dyn OrderManagement>,
        status_source: Arc<dyn StatusSource>,
        config_loader: Arc<ConfigLoader>,
    ) -> Self {
        let payment_method = Arc::new(UnitellerPaymentMethod::new(config.clone()));
        Self {
            config,
            orders,
            status_source,
            payment_method,
            config_loader,
        }
    }

    pub fn callback_processor(&self) -> CallbackProcessor {
        CallbackProcessor::new(self.orders.clone())
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.orders.clone(), self.status_source.clone())
    }
}
