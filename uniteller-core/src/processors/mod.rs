//! Payment flows.
//!
//! - `CallbackProcessor`: handles a `ProviderCallback`, yields a `StatusTransition`
//! - `Reconciler`: handles a `Reconcile` request, replays reported statuses
//! - `PaymentRedirect`: builds the signed form for a checkout

pub mod callback;
pub mod reconcile;
pub mod redirect;
pub mod status;

pub use callback::{CallbackProcessor, ProviderCallback, callback_reply};
pub use reconcile::{Reconcile, ReconcileReport, Reconciler};
pub use redirect::PaymentRedirect;
pub use status::{StatusTransition, apply_status};
