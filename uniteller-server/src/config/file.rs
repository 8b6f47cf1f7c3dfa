//! TOML file configuration structures.
//!
//! These structs directly map to the `uniteller-config.toml` file format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uniteller_sdk::config::{DEFAULT_PAYMENT_URL, DEFAULT_RESULTS_URL};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    pub currency: CurrencyConfig,
    pub settings: SettingsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Public storefront URL; return URLs and shopper redirects hang off it.
    pub store_location: String,
    /// Store scope whose settings this instance serves.
    #[serde(default)]
    pub store_id: u32,
    /// Shown on the second line of callback replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_system: Option<String>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (not an argon2 hash),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Uniteller endpoints and status-query policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_payment_url")]
    pub payment_url: String,
    #[serde(default = "default_results_url")]
    pub results_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            payment_url: default_payment_url(),
            results_url: default_results_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_payment_url() -> String {
    DEFAULT_PAYMENT_URL.to_owned()
}

fn default_results_url() -> String {
    DEFAULT_RESULTS_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    uniteller_sdk::client::DEFAULT_TIMEOUT.as_secs()
}

fn default_max_attempts() -> u32 {
    uniteller_sdk::client::DEFAULT_MAX_ATTEMPTS
}

/// Store currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub primary_currency_id: u32,
    #[serde(default)]
    pub currencies: Vec<CurrencyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyEntry {
    pub id: u32,
    pub code: String,
}

/// Default shop settings plus per-store overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub shop_idp: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub additional_fee: Decimal,
    #[serde(default)]
    pub additional_fee_percentage: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stores: Vec<StoreSettingsConfig>,
}

/// Fields one store overrides; absent fields inherit the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettingsConfig {
    pub store_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_idp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_fee: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_fee_percentage: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
[server]
listen = "127.0.0.1:3000"
store_location = "https://shop.example/"

[admin]
secret = "test-secret"

[currency]
primary_currency_id = 1

[[currency.currencies]]
id = 1
code = "RUB"

[settings]
shop_idp = "00001234"
login = "shop-login"
password = "secret"
additional_fee = "2.5"
additional_fee_percentage = true

[[settings.stores]]
store_id = 2
password = "store-two"
"#;

    #[test]
    fn test_config_parsing() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.server.store_id, 0);
        assert!(config.server.merchant_system.is_none());
        assert_eq!(config.provider.payment_url, DEFAULT_PAYMENT_URL);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.provider.max_attempts, 2);
        assert_eq!(config.currency.currencies[0].code, "RUB");
        assert_eq!(config.settings.additional_fee, dec!(2.5));
        assert_eq!(config.settings.stores.len(), 1);
        assert_eq!(
            config.settings.stores[0].password.as_deref(),
            Some("store-two")
        );
        assert!(config.settings.stores[0].login.is_none());
    }

    #[test]
    fn test_config_survives_rewrite() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        let rewritten = toml::to_string_pretty(&config).unwrap();
        let reparsed: FileConfig = toml::from_str(&rewritten).unwrap();
        assert_eq!(reparsed.settings.additional_fee, dec!(2.5));
        assert_eq!(reparsed.settings.stores[0].store_id, 2);
        assert!(reparsed.settings.stores[0].shop_idp.is_none());
    }
}
