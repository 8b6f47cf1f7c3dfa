//! Merchant credentials and fee settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settings issued to the merchant by Uniteller plus the checkout fee.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Uniteller point ID (`Shop_IDP`).
    pub shop_idp: String,
    /// Login for the results endpoint.
    pub login: String,
    /// Shared secret used in every signature.
    pub password: String,
    /// Additional handling fee charged at checkout.
    #[serde(default)]
    pub additional_fee: Decimal,
    /// Whether `additional_fee` is a percentage of the subtotal.
    #[serde(default)]
    pub additional_fee_percentage: bool,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("shop_idp", &self.shop_idp)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("additional_fee", &self.additional_fee)
            .field("additional_fee_percentage", &self.additional_fee_percentage)
            .finish()
    }
}
