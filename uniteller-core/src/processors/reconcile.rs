//! Reconciliation of an order against the status Uniteller reports for it.
//!
//! Runs when the shopper comes back from the payment page, so the order is
//! settled even if the callback never arrived.

use std::sync::Arc;

use kanau::processor::Processor;
use tracing::{debug, warn};
use uniteller_sdk::config::ProviderSettings;
use uniteller_sdk::objects::CallbackStatus;

use super::status::{StatusTransition, apply_status};
use crate::entities::{Order, PaymentStatus};
use crate::errors::PaymentError;
use crate::services::{OrderManagement, StatusSource};

/// Reconcile one order.
#[derive(Debug, Clone)]
pub struct Reconcile {
    pub order: Order,
    pub settings: ProviderSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// False when the order was already paid and no query was made.
    pub queried: bool,
    /// Transitions, one per supported reported status, in reported order.
    pub transitions: Vec<StatusTransition>,
    /// Reported statuses outside the supported set.
    pub skipped: Vec<String>,
}

#[derive(Clone)]
pub struct Reconciler {
    orders: Arc<dyn OrderManagement>,
    statuses: Arc<dyn StatusSource>,
}

impl Reconciler {
    pub fn new(orders: Arc<dyn OrderManagement>, statuses: Arc<dyn StatusSource>) -> Self {
        Self { orders, statuses }
    }
}

impl Processor<Reconcile> for Reconciler {
    type Output = ReconcileReport;
    type Error = PaymentError;

    #[tracing::instrument(skip_all, err, name = "Uniteller:Reconcile", fields(order_id = %input.order.guid))]
    async fn process(&self, input: Reconcile) -> Result<ReconcileReport, PaymentError> {
        let Reconcile {
            mut order,
            settings,
        } = input;

        if order.payment_status == PaymentStatus::Paid {
            debug!("Order already paid, not querying Uniteller");
            return Ok(ReconcileReport::default());
        }

        let order_id = order.guid.to_string();
        let reported = self.statuses.query_statuses(&settings, &order_id).await?;

        let mut report = ReconcileReport {
            queried: true,
            ..Default::default()
        };
        for raw in reported {
            let status = match raw.parse::<CallbackStatus>() {
                Ok(status) => status,
                Err(_) => {
                    warn!(status = %raw, "Skipping unsupported reported status");
                    report.skipped.push(raw);
                    continue;
                }
            };
            let transition = apply_status(self.orders.as_ref(), &order, status).await?;
            order = transition.order.clone();
            report.transitions.push(transition);
        }
        Ok(report)
    }
}
