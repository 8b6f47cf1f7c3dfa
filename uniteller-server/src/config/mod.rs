//! Configuration module for uniteller-server.
//!
//! Handles loading configuration from TOML files and CLI arguments, hashing
//! the admin secret, and persisting settings saved through the admin API.

pub mod file;

use crate::config::file::{FileConfig, SettingsConfig, StoreSettingsConfig};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uniteller_core::config::{
    AdminConfig, CurrencyConfig, DEFAULT_STORE_SCOPE, ProviderConfig, ScopedSettings,
    ServerConfig, SettingsOverride, SharedConfig,
};
use uniteller_core::services::CurrencyTable;
use uniteller_sdk::config::{ProviderEndpoints, ProviderSettings};
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub provider: ProviderConfig,
    pub currency: CurrencyConfig,
    pub settings: ScopedSettings,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(
            self.server,
            self.admin,
            self.provider,
            self.currency,
            self.settings,
        )
    }

    /// Replace every section of a running configuration.
    ///
    /// `server.listen` is copied too but only read at startup.
    pub async fn install(self, shared: &SharedConfig) {
        *shared.server.write().await = self.server;
        *shared.admin.write().await = self.admin;
        *shared.provider.write().await = self.provider;
        *shared.currency.write().await = self.currency;
        *shared.settings.write().await = self.settings;
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    write_lock: Mutex<()>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            write_lock: Mutex::new(()),
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the admin secret if it's plaintext (and rewrite the file)
    /// 5. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = self.read_file()?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        let loaded = self.build_loaded_config(&file_config)?;

        if !AdminConfig::is_hashed(&file_config.admin.secret) {
            file_config.admin.secret = AdminConfig::hash_secret(&file_config.admin.secret)
                .map_err(|e| ConfigError::HashError(e.to_string()))?;
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin secret hashed and config file updated");
            return Ok(LoadedConfig {
                admin: AdminConfig::new(file_config.admin.secret),
                ..loaded
            });
        }

        Ok(loaded)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    /// Apply an admin edit to the running settings and persist it.
    ///
    /// Edits are serialized. The file is written on the blocking pool while
    /// readers keep seeing the old settings; the new ones become visible
    /// only once the write succeeded.
    pub async fn update_settings(
        self: &Arc<Self>,
        shared: &RwLock<ScopedSettings>,
        edit: impl FnOnce(&mut ScopedSettings) + Send,
    ) -> Result<ScopedSettings, ConfigError> {
        let _guard = self.write_lock.lock().await;

        let mut updated = shared.read().await.clone();
        edit(&mut updated);

        let loader = Arc::clone(self);
        let to_save = updated.clone();
        tokio::task::spawn_blocking(move || loader.save_settings(&to_save))
            .await
            .map_err(|e| ConfigError::IoError(std::io::Error::other(e)))??;

        *shared.write().await = updated.clone();
        Ok(updated)
    }

    /// Persist provider settings to the config file.
    ///
    /// Only the `[settings]` section is replaced; the rest of the file is
    /// re-read so concurrent manual edits to other sections survive.
    pub fn save_settings(&self, settings: &ScopedSettings) -> Result<(), ConfigError> {
        let mut file_config = self.read_file()?;
        file_config.settings = settings_to_file(settings);
        self.rewrite_config(&file_config)?;
        tracing::info!(path = ?self.config_path, "Provider settings saved");
        Ok(())
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        Ok(toml::from_str(&config_content)?)
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    fn build_loaded_config(&self, file_config: &FileConfig) -> Result<LoadedConfig, ConfigError> {
        let server = &file_config.server;
        let store_location = Url::parse(&server.store_location).map_err(|e| {
            ConfigError::ValidationError(format!("invalid store_location: {e}"))
        })?;
        if !matches!(store_location.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(
                "store_location must be an http(s) URL".to_owned(),
            ));
        }

        let provider = &file_config.provider;
        if provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be positive".to_owned(),
            ));
        }
        if provider.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_attempts must be at least 1".to_owned(),
            ));
        }
        let endpoints = ProviderEndpoints {
            payment_url: parse_url("provider.payment_url", &provider.payment_url)?,
            results_url: parse_url("provider.results_url", &provider.results_url)?,
        };

        let currency = CurrencyConfig {
            primary_currency_id: file_config.currency.primary_currency_id,
            table: CurrencyTable::new(
                file_config
                    .currency
                    .currencies
                    .iter()
                    .map(|c| (c.id, c.code.clone())),
            ),
        };
        currency
            .primary_currency_code()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(LoadedConfig {
            server: ServerConfig::new(
                server.listen,
                server.store_location.clone(),
                server.store_id,
                server.merchant_system.clone(),
            ),
            admin: AdminConfig::new(file_config.admin.secret.clone()),
            provider: ProviderConfig {
                endpoints,
                timeout: Duration::from_secs(provider.timeout_secs),
                max_attempts: provider.max_attempts,
            },
            currency,
            settings: settings_from_file(&file_config.settings)?,
        })
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::ValidationError(format!("invalid {field}: {e}")))
}

fn settings_from_file(file: &SettingsConfig) -> Result<ScopedSettings, ConfigError> {
    let mut settings = ScopedSettings::new(ProviderSettings {
        shop_idp: file.shop_idp.clone(),
        login: file.login.clone(),
        password: file.password.clone(),
        additional_fee: file.additional_fee,
        additional_fee_percentage: file.additional_fee_percentage,
    });

    let mut seen = HashSet::new();
    for store in &file.stores {
        if store.store_id == DEFAULT_STORE_SCOPE {
            return Err(ConfigError::ValidationError(
                "settings.stores cannot override store 0; edit [settings] instead".to_owned(),
            ));
        }
        if !seen.insert(store.store_id) {
            return Err(ConfigError::ValidationError(format!(
                "settings for store {} given twice",
                store.store_id
            )));
        }
        settings = settings.with_override(
            store.store_id,
            SettingsOverride {
                shop_idp: store.shop_idp.clone(),
                login: store.login.clone(),
                password: store.password.clone(),
                additional_fee: store.additional_fee,
                additional_fee_percentage: store.additional_fee_percentage,
            },
        );
    }
    Ok(settings)
}

fn settings_to_file(settings: &ScopedSettings) -> SettingsConfig {
    let default = settings.default_settings();
    SettingsConfig {
        shop_idp: default.shop_idp.clone(),
        login: default.login.clone(),
        password: default.password.clone(),
        additional_fee: default.additional_fee,
        additional_fee_percentage: default.additional_fee_percentage,
        stores: settings
            .store_overrides()
            .map(|(store_id, o)| StoreSettingsConfig {
                store_id,
                shop_idp: o.shop_idp.clone(),
                login: o.login.clone(),
                password: o.password.clone(),
                additional_fee: o.additional_fee,
                additional_fee_percentage: o.additional_fee_percentage,
            })
            .collect(),
    }
}
