use thiserror::Error;
use uuid::Uuid;

/// Failures of the order-management backend.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(Uuid),

    #[error("order backend error: {0}")]
    Backend(String),
}

/// Errors of the payment flows.
///
/// The first three variants display as the text Uniteller receives in a
/// `FAIL` reply.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// `Order_ID` is not a UUID or names no known order.
    #[error("Order cannot be loaded")]
    InvalidOrderReference,

    /// The recomputed callback signature disagrees with the supplied one.
    #[error("Invalid order data")]
    SignatureMismatch,

    /// The reported status is outside `CANCELED` / `AUTHORIZED` / `PAID`.
    #[error("Unsupported status")]
    UnsupportedStatus(String),

    /// The status lookup failed or timed out.
    #[error("Uniteller is unavailable: {0}")]
    ProviderUnavailable(String),

    /// The configured primary store currency is unknown.
    #[error("currency {0} not found")]
    CurrencyNotFound(u32),

    /// The operation is not offered by this payment method.
    #[error("{0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Orders(#[from] OrderError),
}
