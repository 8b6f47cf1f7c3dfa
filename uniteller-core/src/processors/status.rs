//! Mapping of Uniteller statuses onto order transitions.

use tracing::{debug, info};
use uniteller_sdk::objects::CallbackStatus;

use crate::entities::{Order, PaymentStatus};
use crate::errors::OrderError;
use crate::services::OrderManagement;

/// Outcome of handling one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub status: CallbackStatus,
    /// Whether the order was eligible and the transition was performed.
    pub applied: bool,
    /// The order after handling; unchanged when `applied` is false.
    pub order: Order,
}

impl StatusTransition {
    /// Message of the `SUCCESS` reply for this status.
    pub fn reply_message(&self) -> &'static str {
        match self.status {
            CallbackStatus::Canceled => "Your order has been canceled",
            CallbackStatus::Authorized => "Your order has been authorized",
            CallbackStatus::Paid => "Your order has been paid",
        }
    }
}

/// Apply `status` to `order` if the order is eligible.
///
/// Ineligible orders are left alone; that is not an error.
#[tracing::instrument(skip_all, fields(order_id = %order.guid, status = %status))]
pub async fn apply_status(
    orders: &dyn OrderManagement,
    order: &Order,
    status: CallbackStatus,
) -> Result<StatusTransition, OrderError> {
    let updated = match status {
        CallbackStatus::Canceled => {
            let captured = matches!(
                order.payment_status,
                PaymentStatus::Paid | PaymentStatus::Authorized
            );
            if captured && orders.can_cancel_order(order) {
                Some(orders.cancel_order(order, true).await?)
            } else {
                None
            }
        }
        CallbackStatus::Authorized => {
            if orders.can_mark_order_as_authorized(order) {
                Some(orders.mark_order_as_authorized(order).await?)
            } else {
                None
            }
        }
        CallbackStatus::Paid => {
            if orders.can_mark_order_as_paid(order) {
                Some(orders.mark_order_as_paid(order).await?)
            } else {
                None
            }
        }
    };

    Ok(match updated {
        Some(order) => {
            info!(payment_status = %order.payment_status, "Order status updated");
            StatusTransition {
                status,
                applied: true,
                order,
            }
        }
        None => {
            debug!(payment_status = %order.payment_status, "Order not eligible, skipped");
            StatusTransition {
                status,
                applied: false,
                order: order.clone(),
            }
        }
    })
}
