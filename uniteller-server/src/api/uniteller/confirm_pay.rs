use axum::{extract::State, http::header, response::IntoResponse};
use kanau::processor::Processor;
use uniteller_core::processors::{ProviderCallback, callback_reply};

use crate::api::extractors::CallbackForm;
use crate::state::AppState;

/// `GET|POST /Plugins/Uniteller/ConfirmPay`: Uniteller status callback.
///
/// Always answers 200 with a plain-text `SUCCESS` or `FAIL` reply.
pub(super) async fn confirm_pay(
    State(state): State<AppState>,
    CallbackForm(fields): CallbackForm,
) -> impl IntoResponse {
    let settings = state.config.resolved_settings().await;
    let system = state.config.server.read().await.merchant_system.clone();

    let outcome = state
        .callback_processor()
        .process(ProviderCallback { fields, settings })
        .await;
    let reply = callback_reply(&system, &outcome);

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply.to_string(),
    )
}
