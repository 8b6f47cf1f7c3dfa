//! Signature algorithm and verification for the Uniteller protocol.
//!
//! Uniteller does not use an HMAC. Both directions authenticate with plain
//! MD5 digests that mix in the shop password known only to the merchant and
//! the provider.
//!
//! * **Payment form** (merchant → Uniteller):
//!
//!   ```text
//!   h(x) = lowercase_hex(MD5(x)),  E = h("")
//!   UPPER_HEX(MD5("h(Shop_IDP)&h(Order_IDP)&h(Subtotal_P)&E&E&E&h(Customer_IDP)&E&E&E&h(password)"))
//!   ```
//!
//!   The six `E` slots stand for optional form fields this integration never
//!   sends.
//!
//! * **Status callback** (Uniteller → merchant):
//!   `UPPER_HEX(MD5("{Order_ID}{Status}{password}"))`

/// Errors produced by signature verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid signature")]
    SignatureMismatch,
}

/// MD5 digest of `input` as lowercase hex.
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

fn md5_upper_hex(input: &str) -> String {
    format!("{:X}", md5::compute(input.as_bytes()))
}

// ---------------------------------------------------------------------------
// Payment form signing
// ---------------------------------------------------------------------------

/// Sign the cleartext fields of a payment form.
///
/// `subtotal` must already be rendered the way it is posted (two fractional
/// digits), since the digest covers the exact string.
pub fn sign_payment(
    shop_idp: &str,
    order_idp: &str,
    subtotal: &str,
    customer_idp: &str,
    password: &str,
) -> String {
    let empty = md5_hex("");
    let data = format!(
        "{shop}&{order}&{amount}&{e}&{e}&{e}&{customer}&{e}&{e}&{e}&{password}",
        shop = md5_hex(shop_idp),
        order = md5_hex(order_idp),
        amount = md5_hex(subtotal),
        customer = md5_hex(customer_idp),
        password = md5_hex(password),
        e = empty,
    );
    md5_upper_hex(&data)
}

// ---------------------------------------------------------------------------
// Callback signing
// ---------------------------------------------------------------------------

/// Compute the signature Uniteller attaches to a status callback.
///
/// The raw `order_id` and `status` strings are used exactly as received.
pub fn sign_callback(order_id: &str, status: &str, password: &str) -> String {
    md5_upper_hex(&format!("{order_id}{status}{password}"))
}

/// Verify a callback signature. The comparison is exact, so a lowercase
/// rendering of the right digest is rejected.
pub fn verify_callback(
    order_id: &str,
    status: &str,
    password: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    if sign_callback(order_id, status, password) == signature {
        Ok(())
    } else {
        Err(SignatureError::SignatureMismatch)
    }
}
