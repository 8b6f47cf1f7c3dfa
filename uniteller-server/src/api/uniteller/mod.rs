//! Uniteller-facing and shopper-facing endpoints.
//!
//! # Endpoints
//!
//! - `GET|POST /Plugins/Uniteller/ConfirmPay`  – provider status callback
//! - `GET      /Plugins/Uniteller/Success`     – shopper return after payment
//! - `GET      /Plugins/Uniteller/CancelOrder` – shopper return after cancelling
//! - `GET      /Plugins/Uniteller/Redirect`    – auto-submitting payment form

use axum::{Router, routing::get};

use crate::state::AppState;

mod cancel_order;
mod confirm_pay;
mod redirect;
mod success;

/// Build the Uniteller router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/Plugins/Uniteller/ConfirmPay",
            get(confirm_pay::confirm_pay).post(confirm_pay::confirm_pay),
        )
        .route("/Plugins/Uniteller/Success", get(success::success))
        .route("/Plugins/Uniteller/CancelOrder", get(cancel_order::cancel_order))
        .route("/Plugins/Uniteller/Redirect", get(redirect::redirect))
}
