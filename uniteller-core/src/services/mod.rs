//! Collaborators owned by the host platform.
//!
//! The payment flows never touch order storage, currencies or the network
//! directly; they go through the traits below.

mod currency;
mod memory;

pub use currency::CurrencyTable;
pub use memory::MemoryOrderBook;

use async_trait::async_trait;
use uniteller_sdk::client::{ClientError, ResultsClient};
use uniteller_sdk::config::ProviderSettings;
use uuid::Uuid;

use crate::entities::{Order, OrderNote};
use crate::errors::{OrderError, PaymentError};

/// Order lookup and payment-status transitions.
///
/// The `can_*` checks encode the host's eligibility rules; the mutators
/// return the order as it is after the transition.
#[async_trait]
pub trait OrderManagement: Send + Sync {
    async fn get_order_by_guid(&self, guid: Uuid) -> Result<Option<Order>, OrderError>;

    async fn insert_order_note(&self, note: OrderNote) -> Result<(), OrderError>;

    fn can_cancel_order(&self, order: &Order) -> bool;

    /// `from_payment_notice` marks a cancellation requested by a provider
    /// notification rather than by staff.
    async fn cancel_order(&self, order: &Order, from_payment_notice: bool)
    -> Result<Order, OrderError>;

    fn can_mark_order_as_authorized(&self, order: &Order) -> bool;

    async fn mark_order_as_authorized(&self, order: &Order) -> Result<Order, OrderError>;

    fn can_mark_order_as_paid(&self, order: &Order) -> bool;

    async fn mark_order_as_paid(&self, order: &Order) -> Result<Order, OrderError>;
}

/// Resolves currency codes from the host's currency ids.
pub trait CurrencyLookup: Send + Sync {
    fn currency_code(&self, currency_id: u32) -> Option<String>;
}

/// Authoritative order status as reported by Uniteller.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Statuses reported for `order_id`, uppercased, in the provider's order.
    async fn query_statuses(
        &self,
        settings: &ProviderSettings,
        order_id: &str,
    ) -> Result<Vec<String>, PaymentError>;
}

#[async_trait]
impl StatusSource for ResultsClient {
    async fn query_statuses(
        &self,
        settings: &ProviderSettings,
        order_id: &str,
    ) -> Result<Vec<String>, PaymentError> {
        match self.fetch_statuses(settings, order_id).await {
            Ok(statuses) => Ok(statuses),
            Err(ClientError::Report(e)) => {
                tracing::warn!(order_id, error = %e, "Unreadable Uniteller status report");
                Ok(Vec::new())
            }
            Err(e) => Err(PaymentError::ProviderUnavailable(e.to_string())),
        }
    }
}
