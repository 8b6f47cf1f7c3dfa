//! The Uniteller payment method as the host checkout sees it.

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use time::{Duration, OffsetDateTime};
use uniteller_sdk::config::ProviderSettings;
use uniteller_sdk::objects::PaymentForm;

use crate::config::SharedConfig;
use crate::entities::{Order, PaymentStatus};
use crate::errors::PaymentError;
use crate::processors::PaymentRedirect;

pub const SYSTEM_NAME: &str = "Payments.Uniteller";

/// Shown to the shopper when choosing a payment method.
pub const PAYMENT_METHOD_DESCRIPTION: &str =
    "For payment you will be redirected to the website uniteller.ru.";

/// Minimum age of an order before the shopper may retry the payment.
const REPOST_DELAY: Duration = Duration::seconds(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethodType {
    Standard,
    Redirection,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringPaymentType {
    NotSupported,
    Manual,
    Automatic,
}

/// Operations a payment method supports beyond taking a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub capture: bool,
    pub partial_refund: bool,
    pub refund: bool,
    pub void: bool,
    pub skip_payment_info: bool,
    pub hide_payment_method: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessPaymentResult {
    pub new_payment_status: PaymentStatus,
}

/// A checkout payment method.
#[async_trait]
pub trait PaymentMethod: Send + Sync {
    fn system_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn payment_method_type(&self) -> PaymentMethodType;

    fn recurring_payment_type(&self) -> RecurringPaymentType;

    fn capabilities(&self) -> Capabilities;

    async fn configuration_page_url(&self) -> String;

    /// Called when the order is placed, before any redirect.
    async fn process_payment(&self, order: &Order) -> Result<ProcessPaymentResult, PaymentError>;

    /// Called after the order is placed; yields the form the shopper posts.
    async fn post_process_payment(&self, order: &Order) -> Result<PaymentForm, PaymentError>;

    async fn additional_handling_fee(&self, subtotal: Decimal) -> Decimal;

    fn can_repost_process_payment(&self, order: &Order, now: OffsetDateTime) -> bool;

    async fn capture(&self, order: &Order) -> Result<(), PaymentError>;

    async fn refund(&self, order: &Order, amount: Decimal) -> Result<(), PaymentError>;

    async fn void(&self, order: &Order) -> Result<(), PaymentError>;

    async fn process_recurring_payment(&self, order: &Order) -> Result<(), PaymentError>;

    async fn cancel_recurring_payment(&self, order: &Order) -> Result<(), PaymentError>;
}

/// Fee added to the order for paying through Uniteller.
pub fn additional_fee(settings: &ProviderSettings, subtotal: Decimal) -> Decimal {
    if settings.additional_fee <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if settings.additional_fee_percentage {
        (subtotal * settings.additional_fee / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        settings.additional_fee
    }
}

pub struct UnitellerPaymentMethod {
    config: SharedConfig,
}

impl UnitellerPaymentMethod {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PaymentMethod for UnitellerPaymentMethod {
    fn system_name(&self) -> &'static str {
        SYSTEM_NAME
    }

    fn description(&self) -> &'static str {
        PAYMENT_METHOD_DESCRIPTION
    }

    fn payment_method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Redirection
    }

    fn recurring_payment_type(&self) -> RecurringPaymentType {
        RecurringPaymentType::NotSupported
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    async fn configuration_page_url(&self) -> String {
        let store = self.config.server.read().await.store_location.clone();
        format!("{store}Admin/PaymentUniteller/Configure")
    }

    async fn process_payment(&self, _order: &Order) -> Result<ProcessPaymentResult, PaymentError> {
        Ok(ProcessPaymentResult {
            new_payment_status: PaymentStatus::Pending,
        })
    }

    #[tracing::instrument(skip_all, err, fields(order_id = %order.guid))]
    async fn post_process_payment(&self, order: &Order) -> Result<PaymentForm, PaymentError> {
        let settings = self.config.resolved_settings().await;
        let currency_code = self.config.currency.read().await.primary_currency_code()?;
        let store_location = self.config.server.read().await.store_location.clone();

        Ok(PaymentRedirect {
            order,
            settings: &settings,
            currency_code: &currency_code,
            store_location: &store_location,
        }
        .build_form())
    }

    async fn additional_handling_fee(&self, subtotal: Decimal) -> Decimal {
        additional_fee(&self.config.resolved_settings().await, subtotal)
    }

    fn can_repost_process_payment(&self, order: &Order, now: OffsetDateTime) -> bool {
        now - order.created_at >= REPOST_DELAY
    }

    async fn capture(&self, _order: &Order) -> Result<(), PaymentError> {
        Err(PaymentError::Unsupported("Capture method not supported"))
    }

    async fn refund(&self, _order: &Order, _amount: Decimal) -> Result<(), PaymentError> {
        Err(PaymentError::Unsupported("Refund method not supported"))
    }

    async fn void(&self, _order: &Order) -> Result<(), PaymentError> {
        Err(PaymentError::Unsupported("Void method not supported"))
    }

    async fn process_recurring_payment(&self, _order: &Order) -> Result<(), PaymentError> {
        Err(PaymentError::Unsupported("Recurring payment not supported"))
    }

    async fn cancel_recurring_payment(&self, _order: &Order) -> Result<(), PaymentError> {
        Err(PaymentError::Unsupported("Recurring payment not supported"))
    }
}
