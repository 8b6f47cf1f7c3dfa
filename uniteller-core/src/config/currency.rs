use crate::errors::PaymentError;
use crate::services::{CurrencyLookup, CurrencyTable};

/// Store currency resolution.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConfig {
    /// Host id of the primary store currency.
    pub primary_currency_id: u32,
    pub table: CurrencyTable,
}

impl CurrencyConfig {
    /// Code of the primary store currency.
    pub fn primary_currency_code(&self) -> Result<String, PaymentError> {
        self.table
            .currency_code(self.primary_currency_id)
            .ok_or(PaymentError::CurrencyNotFound(self.primary_currency_id))
    }
}
