//! Provider settings scoped per store.
//!
//! A multi-store host keeps one default [`ProviderSettings`] and lets any
//! store override individual fields. Request handlers never see the scopes:
//! they call [`ScopedSettings::resolve`] once and work with the merged value.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uniteller_sdk::config::ProviderSettings;

/// Store id that addresses the default settings.
pub const DEFAULT_STORE_SCOPE: u32 = 0;

/// Fields a single store overrides. `None` inherits the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverride {
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

impl SettingsOverride {
    pub fn is_empty(&self) -> bool {
        self.flags() == OverrideFlags::default()
    }

    pub fn flags(&self) -> OverrideFlags {
        OverrideFlags {
            shop_idp: self.shop_idp.is_some(),
            login: self.login.is_some(),
            password: self.password.is_some(),
            additional_fee: self.additional_fee.is_some(),
            additional_fee_percentage: self.additional_fee_percentage.is_some(),
        }
    }

    fn merge_onto(&self, mut base: ProviderSettings) -> ProviderSettings {
        if let Some(v) = &self.shop_idp {
            base.shop_idp.clone_from(v);
        }
        if let Some(v) = &self.login {
            base.login.clone_from(v);
        }
        if let Some(v) = &self.password {
            base.password.clone_from(v);
        }
        if let Some(v) = self.additional_fee {
            base.additional_fee = v;
        }
        if let Some(v) = self.additional_fee_percentage {
            base.additional_fee_percentage = v;
        }
        base
    }
}

/// Which fields a store overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideFlags {
    pub shop_idp: bool,
    pub login: bool,
    pub password: bool,
    pub additional_fee: bool,
    pub additional_fee_percentage: bool,
}

/// Default provider settings plus sparse per-store overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedSettings {
    default: ProviderSettings,
    stores: BTreeMap<u32, SettingsOverride>,
}

impl ScopedSettings {
    pub fn new(default: ProviderSettings) -> Self {
        Self {
            default,
            stores: BTreeMap::new(),
        }
    }

    /// Attach the overrides of one store. Empty overrides are dropped.
    pub fn with_override(mut self, store_id: u32, overrides: SettingsOverride) -> Self {
        if store_id != DEFAULT_STORE_SCOPE && !overrides.is_empty() {
            self.stores.insert(store_id, overrides);
        }
        self
    }

    pub fn default_settings(&self) -> &ProviderSettings {
        &self.default
    }

    /// Stores with at least one override, by ascending id.
    pub fn store_overrides(&self) -> impl Iterator<Item = (u32, &SettingsOverride)> {
        self.stores.iter().map(|(id, o)| (*id, o))
    }

    /// Effective settings of `store_id`.
    pub fn resolve(&self, store_id: u32) -> ProviderSettings {
        match self.stores.get(&store_id) {
            Some(overrides) => overrides.merge_onto(self.default.clone()),
            None => self.default.clone(),
        }
    }

    pub fn overrides_for(&self, store_id: u32) -> OverrideFlags {
        self.stores
            .get(&store_id)
            .map(SettingsOverride::flags)
            .unwrap_or_default()
    }

    /// Save settings edited in the scope of `store_id`.
    ///
    /// The default scope replaces the defaults and ignores `flags`. A store
    /// scope stores each flagged field as an override and removes the
    /// override of every unflagged one.
    pub fn apply(&mut self, store_id: u32, values: ProviderSettings, flags: OverrideFlags) {
        if store_id == DEFAULT_STORE_SCOPE {
            self.default = values;
            return;
        }

        let overrides = SettingsOverride {
            shop_idp: flags.shop_idp.then_some(values.shop_idp),
            login: flags.login.then_some(values.login),
            password: flags.password.then_some(values.password),
            additional_fee: flags.additional_fee.then_some(values.additional_fee),
            additional_fee_percentage: flags
                .additional_fee_percentage
                .then_some(values.additional_fee_percentage),
        };
        if overrides.is_empty() {
            self.stores.remove(&store_id);
        } else {
            self.stores.insert(store_id, overrides);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn defaults() -> ProviderSettings {
        ProviderSettings {
            shop_idp: "00001234".into(),
            login: "shop-login".into(),
            password: "secret".into(),
            additional_fee: dec!(0),
            additional_fee_percentage: false,
        }
    }

    #[test]
    fn store_without_overrides_resolves_to_default() {
        let settings = ScopedSettings::new(defaults());
        assert_eq!(settings.resolve(3), defaults());
        assert_eq!(settings.overrides_for(3), OverrideFlags::default());
    }

    #[test]
    fn overrides_replace_only_their_fields() {
        let settings = ScopedSettings::new(defaults()).with_override(
            2,
            SettingsOverride {
                password: Some("store-two".into()),
                additional_fee: Some(dec!(2.5)),
                ..Default::default()
            },
        );

        let resolved = settings.resolve(2);
        assert_eq!(resolved.password, "store-two");
        assert_eq!(resolved.additional_fee, dec!(2.5));
        assert_eq!(resolved.shop_idp, "00001234");
        assert_eq!(settings.resolve(1), defaults());

        let flags = settings.overrides_for(2);
        assert!(flags.password && flags.additional_fee);
        assert!(!flags.shop_idp && !flags.login && !flags.additional_fee_percentage);
    }

    #[test]
    fn default_scope_rewrites_defaults() {
        let mut settings = ScopedSettings::new(defaults());
        let mut values = defaults();
        values.login = "new-login".into();

        settings.apply(DEFAULT_STORE_SCOPE, values.clone(), OverrideFlags::default());
        assert_eq!(settings.default_settings(), &values);
        assert_eq!(settings.store_overrides().count(), 0);
    }

    #[test]
    fn store_scope_keeps_flagged_and_clears_unflagged() {
        let mut settings = ScopedSettings::new(defaults()).with_override(
            5,
            SettingsOverride {
                login: Some("old".into()),
                shop_idp: Some("99999999".into()),
                ..Default::default()
            },
        );

        let mut values = defaults();
        values.login = "store-five".into();
        values.additional_fee_percentage = true;
        settings.apply(
            5,
            values,
            OverrideFlags {
                login: true,
                additional_fee_percentage: true,
                ..Default::default()
            },
        );

        let resolved = settings.resolve(5);
        assert_eq!(resolved.login, "store-five");
        assert!(resolved.additional_fee_percentage);
        assert_eq!(resolved.shop_idp, "00001234");
        assert_eq!(settings.default_settings(), &defaults());
    }

    #[test]
    fn clearing_every_flag_removes_the_store() {
        let mut settings = ScopedSettings::new(defaults()).with_override(
            5,
            SettingsOverride {
                login: Some("old".into()),
                ..Default::default()
            },
        );
        settings.apply(5, defaults(), OverrideFlags::default());
        assert_eq!(settings.store_overrides().count(), 0);
    }
}
