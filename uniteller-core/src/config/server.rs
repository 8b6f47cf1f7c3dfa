//! Server configuration.

use std::net::SocketAddr;

/// Name shown on the second line of every callback reply when none is configured.
pub const DEFAULT_MERCHANT_SYSTEM: &str = "nopCommerce";

/// Server configuration with runtime values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
    /// Public storefront base URL, always ending in `/`.
    pub store_location: String,
    /// Store scope used to resolve provider settings.
    pub store_id: u32,
    /// Merchant system name echoed in callback replies.
    pub merchant_system: String,
}

impl ServerConfig {
    pub fn new(
        listen: SocketAddr,
        store_location: impl Into<String>,
        store_id: u32,
        merchant_system: Option<String>,
    ) -> Self {
        let mut store_location = store_location.into();
        if !store_location.ends_with('/') {
            store_location.push('/');
        }
        Self {
            listen,
            store_location,
            store_id,
            merchant_system: merchant_system
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MERCHANT_SYSTEM.to_owned()),
        }
    }

    /// Storefront order-completed page.
    pub fn checkout_completed_url(&self, order_id: i64) -> String {
        format!("{}checkout/completed/{order_id}", self.store_location)
    }

    /// Storefront order-details page.
    pub fn order_details_url(&self, order_id: i64) -> String {
        format!("{}orderdetails/{order_id}", self.store_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listen() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[test]
    fn store_location_gets_trailing_slash() {
        let config = ServerConfig::new(listen(), "https://shop.example", 0, None);
        assert_eq!(config.store_location, "https://shop.example/");
        assert_eq!(
            config.checkout_completed_url(17),
            "https://shop.example/checkout/completed/17"
        );
        assert_eq!(
            config.order_details_url(17),
            "https://shop.example/orderdetails/17"
        );
    }

    #[test]
    fn blank_merchant_system_falls_back() {
        let config = ServerConfig::new(listen(), "https://shop.example/", 0, Some("  ".into()));
        assert_eq!(config.merchant_system, DEFAULT_MERCHANT_SYSTEM);

        let config = ServerConfig::new(listen(), "https://shop.example/", 0, Some("MyShop".into()));
        assert_eq!(config.merchant_system, "MyShop");
    }
}
