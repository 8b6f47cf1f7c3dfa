//! Admin API handlers.
//!
//! These endpoints back the store's admin settings page and require the
//! `Uniteller-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET  /Admin/PaymentUniteller/Configure?store_id=N` – settings as seen from a store scope
//! - `POST /Admin/PaymentUniteller/Configure`            – save settings for a store scope

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::config::ConfigError;
use crate::state::AppState;

mod configure;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/Admin/PaymentUniteller/Configure",
        get(configure::load_settings).post(configure::save_settings),
    )
}

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    Persist(ConfigError),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::Persist(e) => {
                tracing::error!(error = %e, "Failed to persist provider settings");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
