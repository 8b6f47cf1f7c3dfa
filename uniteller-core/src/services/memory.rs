//! In-process order book.
//!
//! Backs the standalone server and the tests. Embedding hosts provide their
//! own [`OrderManagement`] over real storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::OrderManagement;
use crate::entities::{Order, OrderNote, OrderStatus, PaymentStatus};
use crate::errors::OrderError;

#[derive(Default)]
struct Book {
    orders: HashMap<Uuid, Order>,
    notes: Vec<OrderNote>,
}

#[derive(Clone, Default)]
pub struct MemoryOrderBook {
    inner: Arc<RwLock<Book>>,
}

impl MemoryOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an order.
    pub async fn insert(&self, order: Order) {
        self.inner.write().await.orders.insert(order.guid, order);
    }

    pub async fn get(&self, guid: Uuid) -> Option<Order> {
        self.inner.read().await.orders.get(&guid).cloned()
    }

    /// Notes attached to `order_id`, oldest first.
    pub async fn notes_for(&self, order_id: i64) -> Vec<OrderNote> {
        self.inner
            .read()
            .await
            .notes
            .iter()
            .filter(|n| n.order_id == order_id)
            .cloned()
            .collect()
    }

    async fn transition(
        &self,
        order: &Order,
        note: &str,
        apply: impl FnOnce(&mut Order),
    ) -> Result<Order, OrderError> {
        let mut book = self.inner.write().await;
        let stored = book
            .orders
            .get_mut(&order.guid)
            .ok_or(OrderError::NotFound(order.guid))?;
        apply(stored);
        let updated = stored.clone();
        book.notes.push(OrderNote::internal(updated.id, note));
        debug!(
            order_id = updated.id,
            payment_status = %updated.payment_status,
            "Order transitioned"
        );
        Ok(updated)
    }
}

#[async_trait]
impl OrderManagement for MemoryOrderBook {
    async fn get_order_by_guid(&self, guid: Uuid) -> Result<Option<Order>, OrderError> {
        Ok(self.get(guid).await)
    }

    async fn insert_order_note(&self, note: OrderNote) -> Result<(), OrderError> {
        self.inner.write().await.notes.push(note);
        Ok(())
    }

    fn can_cancel_order(&self, order: &Order) -> bool {
        order.order_status != OrderStatus::Cancelled
    }

    async fn cancel_order(
        &self,
        order: &Order,
        from_payment_notice: bool,
    ) -> Result<Order, OrderError> {
        let note = if from_payment_notice {
            "Order has been cancelled by payment notice"
        } else {
            "Order has been cancelled"
        };
        self.transition(order, note, |o| {
            o.order_status = OrderStatus::Cancelled;
            if matches!(o.payment_status, PaymentStatus::Authorized) {
                o.payment_status = PaymentStatus::Voided;
            }
        })
        .await
    }

    fn can_mark_order_as_authorized(&self, order: &Order) -> bool {
        order.order_status != OrderStatus::Cancelled
            && order.payment_status == PaymentStatus::Pending
    }

    async fn mark_order_as_authorized(&self, order: &Order) -> Result<Order, OrderError> {
        self.transition(order, "Order has been marked as authorized", |o| {
            o.payment_status = PaymentStatus::Authorized;
        })
        .await
    }

    fn can_mark_order_as_paid(&self, order: &Order) -> bool {
        order.order_status != OrderStatus::Cancelled
            && !matches!(
                order.payment_status,
                PaymentStatus::Paid | PaymentStatus::Refunded | PaymentStatus::Voided
            )
    }

    async fn mark_order_as_paid(&self, order: &Order) -> Result<Order, OrderError> {
        self.transition(order, "Order has been marked as paid", |o| {
            o.payment_status = PaymentStatus::Paid;
            if o.order_status == OrderStatus::Pending {
                o.order_status = OrderStatus::Processing;
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_order;

    #[tokio::test]
    async fn mark_paid_moves_pending_order_to_processing() {
        let book = MemoryOrderBook::new();
        let order = sample_order(PaymentStatus::Pending);
        book.insert(order.clone()).await;

        assert!(book.can_mark_order_as_paid(&order));
        let updated = book.mark_order_as_paid(&order).await.unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.order_status, OrderStatus::Processing);
        assert!(!book.can_mark_order_as_paid(&updated));
        assert_eq!(book.notes_for(42).await.len(), 1);
    }

    #[tokio::test]
    async fn authorize_only_from_pending() {
        let book = MemoryOrderBook::new();
        let order = sample_order(PaymentStatus::Pending);
        book.insert(order.clone()).await;

        let updated = book.mark_order_as_authorized(&order).await.unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Authorized);
        assert!(!book.can_mark_order_as_authorized(&updated));
        assert!(book.can_mark_order_as_paid(&updated));
    }

    #[tokio::test]
    async fn cancel_voids_authorization() {
        let book = MemoryOrderBook::new();
        let order = sample_order(PaymentStatus::Authorized);
        book.insert(order.clone()).await;

        let updated = book.cancel_order(&order, true).await.unwrap();
        assert_eq!(updated.order_status, OrderStatus::Cancelled);
        assert_eq!(updated.payment_status, PaymentStatus::Voided);
        assert!(!book.can_cancel_order(&updated));
        let notes = book.notes_for(42).await;
        assert_eq!(notes[0].note, "Order has been cancelled by payment notice");
    }

    #[tokio::test]
    async fn transition_of_unknown_order_fails() {
        let book = MemoryOrderBook::new();
        let order = sample_order(PaymentStatus::Pending);
        let err = book.mark_order_as_paid(&order).await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound(id) if id == order.guid));
    }
}
