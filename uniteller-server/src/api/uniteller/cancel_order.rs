use axum::{extract::State, response::Redirect};

use crate::api::extractors::OrderReference;
use crate::state::AppState;

/// `GET /Plugins/Uniteller/CancelOrder`: shopper left the payment page.
///
/// Sends the shopper to the order details page, or to the store front when
/// the order is unknown.
pub(super) async fn cancel_order(
    State(state): State<AppState>,
    OrderReference(guid): OrderReference,
) -> Redirect {
    let server = state.config.server.read().await.clone();

    let Some(guid) = guid else {
        return Redirect::to(&server.store_location);
    };
    match state.orders.get_order_by_guid(guid).await {
        Ok(Some(order)) => Redirect::to(&server.order_details_url(order.id)),
        Ok(None) => Redirect::to(&server.store_location),
        Err(e) => {
            tracing::error!(order_id = %guid, error = %e, "Order lookup failed");
            Redirect::to(&server.store_location)
        }
    }
}
