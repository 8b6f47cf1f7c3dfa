//! Construction of the signed payment form for a checkout.

use uniteller_sdk::config::ProviderSettings;
use uniteller_sdk::objects::{PaymentForm, PaymentRequest, ReturnUrls, format_subtotal};

use crate::entities::Order;

/// Everything needed to send one order to the hosted payment page.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRedirect<'a> {
    pub order: &'a Order,
    pub settings: &'a ProviderSettings,
    pub currency_code: &'a str,
    pub store_location: &'a str,
}

impl PaymentRedirect<'_> {
    /// Signed form fields, in posting order.
    pub fn build_form(&self) -> PaymentForm {
        PaymentRequest {
            shop_idp: self.settings.shop_idp.clone(),
            order_idp: self.order.guid.hyphenated().to_string(),
            currency: self.currency_code.to_owned(),
            subtotal: format_subtotal(self.order.order_total),
            customer_idp: self.order.customer_id.to_string(),
            return_urls: ReturnUrls::for_store(self.store_location),
        }
        .sign(&self.settings.password)
    }
}
