//! HTTP API.
//!
//! - `uniteller`: provider callback, shopper return pages and the payment redirect
//! - `admin`: provider settings, guarded by the admin secret

pub mod admin;
pub mod extractors;
pub mod uniteller;

#[cfg(test)]
pub(crate) mod testing;
