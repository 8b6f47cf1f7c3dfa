//! Handling of Uniteller status callbacks.
//!
//! A callback is resolved to an order, recorded on it as an audit note,
//! authenticated, and finally mapped onto an order transition. The note is
//! written before the signature is checked, so forged callbacks that name a
//! real order still leave a trace on it.

use std::sync::Arc;

use kanau::processor::Processor;
use tracing::{error, warn};
use uniteller_sdk::config::ProviderSettings;
use uniteller_sdk::objects::{CallbackFields, CallbackReply, CallbackStatus};
use uuid::Uuid;

use super::status::{StatusTransition, apply_status};
use crate::entities::OrderNote;
use crate::errors::PaymentError;
use crate::services::OrderManagement;

/// A callback together with the settings it is verified against.
#[derive(Debug, Clone)]
pub struct ProviderCallback {
    pub fields: CallbackFields,
    pub settings: ProviderSettings,
}

#[derive(Clone)]
pub struct CallbackProcessor {
    orders: Arc<dyn OrderManagement>,
}

impl CallbackProcessor {
    pub fn new(orders: Arc<dyn OrderManagement>) -> Self {
        Self { orders }
    }
}

impl Processor<ProviderCallback> for CallbackProcessor {
    type Output = StatusTransition;
    type Error = PaymentError;

    #[tracing::instrument(skip_all, err, name = "Uniteller:Callback", fields(order_id = %callback.fields.order_id))]
    async fn process(&self, callback: ProviderCallback) -> Result<StatusTransition, PaymentError> {
        let ProviderCallback { fields, settings } = callback;

        let guid =
            Uuid::parse_str(&fields.order_id).map_err(|_| PaymentError::InvalidOrderReference)?;
        let order = self
            .orders
            .get_order_by_guid(guid)
            .await?
            .ok_or(PaymentError::InvalidOrderReference)?;

        self.orders
            .insert_order_note(OrderNote::internal(order.id, fields.audit_note()))
            .await?;

        fields.verify(&settings.password).map_err(|_| {
            warn!("Callback signature mismatch");
            PaymentError::SignatureMismatch
        })?;

        let status: CallbackStatus = fields
            .status
            .parse()
            .map_err(|e: uniteller_sdk::objects::UnknownStatus| {
                PaymentError::UnsupportedStatus(e.0)
            })?;

        Ok(apply_status(self.orders.as_ref(), &order, status).await?)
    }
}

/// Reply sent back to Uniteller for a processed callback.
///
/// Failures are logged here, once per callback.
pub fn callback_reply(
    system: &str,
    outcome: &Result<StatusTransition, PaymentError>,
) -> CallbackReply {
    match outcome {
        Ok(transition) => CallbackReply::success(system, transition.reply_message()),
        Err(e) => {
            let message = e.to_string();
            error!("Uniteller. {message}");
            CallbackReply::fail(system, message)
        }
    }
}
