//! Uniteller endpoint URLs.

use serde::{Deserialize, Serialize};
use url::Url;

/// Hosted payment page the shopper's browser posts the payment form to.
pub const DEFAULT_PAYMENT_URL: &str = "https://wpay.uniteller.ru/pay/";

/// Server-to-server order status lookup.
pub const DEFAULT_RESULTS_URL: &str = "https://wpay.uniteller.ru/results/";

/// The two Uniteller endpoints this integration talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
    pub payment_url: Url,
    pub results_url: Url,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            payment_url: parse_default(DEFAULT_PAYMENT_URL),
            results_url: parse_default(DEFAULT_RESULTS_URL),
        }
    }
}

#[allow(clippy::expect_used)]
fn parse_default(url: &str) -> Url {
    Url::parse(url).expect("valid default url")
}
