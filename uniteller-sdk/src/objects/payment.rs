//! The payment form posted to the Uniteller hosted payment page.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::signature::sign_payment;

/// `name` attribute of the auto-submitting HTML form.
pub const PAYMENT_FORM_NAME: &str = "PayPoint";

/// Store-relative path the shopper returns to after a successful payment.
pub const SUCCESS_PATH: &str = "Plugins/Uniteller/Success";

/// Store-relative path the shopper returns to after a failed or cancelled payment.
pub const CANCEL_ORDER_PATH: &str = "Plugins/Uniteller/CancelOrder";

/// Render an amount as `Subtotal_P`: rounded half away from zero, always
/// two fractional digits.
pub fn format_subtotal(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Return URLs handed to Uniteller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    pub success: String,
    pub failure: String,
}

impl ReturnUrls {
    /// Build both return URLs from the store location.
    ///
    /// Uniteller rejects `localhost` as an origin, so it is rewritten to
    /// `127.0.0.1`.
    pub fn for_store(store_location: &str) -> Self {
        let mut site = store_location.replace("localhost", "127.0.0.1");
        if !site.ends_with('/') {
            site.push('/');
        }
        Self {
            success: format!("{site}{SUCCESS_PATH}"),
            failure: format!("{site}{CANCEL_ORDER_PATH}"),
        }
    }
}

/// Cleartext payment data before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub shop_idp: String,
    pub order_idp: String,
    pub currency: String,
    pub subtotal: String,
    pub customer_idp: String,
    pub return_urls: ReturnUrls,
}

impl PaymentRequest {
    /// Sign the request with the shop password.
    pub fn sign(self, password: &str) -> PaymentForm {
        let signature = sign_payment(
            &self.shop_idp,
            &self.order_idp,
            &self.subtotal,
            &self.customer_idp,
            password,
        );
        PaymentForm {
            shop_idp: self.shop_idp,
            order_idp: self.order_idp,
            currency: self.currency,
            subtotal: self.subtotal,
            customer_idp: self.customer_idp,
            signature,
            url_return_no: self.return_urls.failure,
            url_return_ok: self.return_urls.success,
        }
    }
}

/// A signed payment form, ready to be posted by the shopper's browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    #[serde(rename = "Shop_IDP")]
    pub shop_idp: String,
    #[serde(rename = "Order_IDP")]
    pub order_idp: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Subtotal_P")]
    pub subtotal: String,
    #[serde(rename = "Customer_IDP")]
    pub customer_idp: String,
    #[serde(rename = "Signature")]
    pub signature: String,
    #[serde(rename = "URL_RETURN_NO")]
    pub url_return_no: String,
    #[serde(rename = "URL_RETURN_OK")]
    pub url_return_ok: String,
}

impl PaymentForm {
    /// Form fields in posting order.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("Shop_IDP", self.shop_idp.as_str()),
            ("Order_IDP", self.order_idp.as_str()),
            ("Currency", self.currency.as_str()),
            ("Subtotal_P", self.subtotal.as_str()),
            ("Customer_IDP", self.customer_idp.as_str()),
            ("Signature", self.signature.as_str()),
            ("URL_RETURN_NO", self.url_return_no.as_str()),
            ("URL_RETURN_OK", self.url_return_ok.as_str()),
        ]
    }
}
