use std::collections::HashMap;

use super::CurrencyLookup;

/// Currency codes keyed by host currency id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyTable {
    codes: HashMap<u32, String>,
}

impl CurrencyTable {
    pub fn new(codes: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.codes.iter().map(|(id, code)| (*id, code.as_str()))
    }
}

impl CurrencyLookup for CurrencyTable {
    fn currency_code(&self, currency_id: u32) -> Option<String> {
        self.codes.get(&currency_id).cloned()
    }
}
