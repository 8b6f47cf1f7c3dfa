//! Provider-side configuration shared by every crate of the workspace.
//!
//! Loading and scoping of these values is handled by `uniteller-core` and
//! the server; this module only defines their shape.

mod endpoints;
mod settings;

pub use endpoints::{DEFAULT_PAYMENT_URL, DEFAULT_RESULTS_URL, ProviderEndpoints};
pub use settings::ProviderSettings;
