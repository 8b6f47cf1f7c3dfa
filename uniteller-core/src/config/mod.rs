//! Runtime configuration shared by the payment flows.
//!
//! These are the validated values the server builds from its TOML file.
//! Parsing and persistence live in the server crate.

mod admin;
mod currency;
mod provider;
mod server;
mod settings;

pub use admin::AdminConfig;
pub use currency::CurrencyConfig;
pub use provider::ProviderConfig;
pub use server::{DEFAULT_MERCHANT_SYSTEM, ServerConfig};
pub use settings::{DEFAULT_STORE_SCOPE, OverrideFlags, ScopedSettings, SettingsOverride};

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// A reload replaces each section independently, so readers of one section
/// never wait on writers of another.
#[derive(Clone)]
pub struct SharedConfig {
    /// Listen address and storefront identity.
    pub server: Arc<RwLock<ServerConfig>>,
    /// Admin API authentication.
    pub admin: Arc<RwLock<AdminConfig>>,
    /// Uniteller endpoints and status-query policy.
    pub provider: Arc<RwLock<ProviderConfig>>,
    /// Store currency resolution.
    pub currency: Arc<RwLock<CurrencyConfig>>,
    /// Shop credentials and fees, per store.
    pub settings: Arc<RwLock<ScopedSettings>>,
}

impl SharedConfig {
    pub fn new(
        server: ServerConfig,
        admin: AdminConfig,
        provider: ProviderConfig,
        currency: CurrencyConfig,
        settings: ScopedSettings,
    ) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            admin: Arc::new(RwLock::new(admin)),
            provider: Arc::new(RwLock::new(provider)),
            currency: Arc::new(RwLock::new(currency)),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Provider settings for the configured store, merged once.
    pub async fn resolved_settings(&self) -> uniteller_sdk::config::ProviderSettings {
        let store_id = self.server.read().await.store_id;
        self.settings.read().await.resolve(store_id)
    }
}
