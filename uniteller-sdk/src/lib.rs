//! Wire protocol for the Uniteller payment gateway.
//!
//! This crate only knows what travels over the wire: the signed payment
//! form posted to the hosted payment page, the status callback posted back
//! by Uniteller, the plain-text reply it expects, and the XML status report
//! returned by the results endpoint.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
pub mod signature;
