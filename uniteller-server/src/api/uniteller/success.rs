use axum::{extract::State, response::Redirect};
use kanau::processor::Processor;
use uniteller_core::processors::Reconcile;

use crate::api::extractors::OrderReference;
use crate::state::AppState;

/// `GET /Plugins/Uniteller/Success`: shopper returned from the payment page.
///
/// Asks Uniteller for the order status before sending the shopper on, so a
/// lost callback does not leave the order unpaid. Reconciliation failures
/// are logged and never change where the shopper goes.
pub(super) async fn success(
    State(state): State<AppState>,
    OrderReference(guid): OrderReference,
) -> Redirect {
    let server = state.config.server.read().await.clone();

    let Some(guid) = guid else {
        return Redirect::to(&server.store_location);
    };
    let order = match state.orders.get_order_by_guid(guid).await {
        Ok(Some(order)) => order,
        Ok(None) => return Redirect::to(&server.store_location),
        Err(e) => {
            tracing::error!(order_id = %guid, error = %e, "Order lookup failed");
            return Redirect::to(&server.store_location);
        }
    };

    let target = server.checkout_completed_url(order.id);
    let settings = state.config.resolved_settings().await;
    match state
        .reconciler()
        .process(Reconcile { order, settings })
        .await
    {
        Ok(report) => tracing::debug!(
            order_id = %guid,
            applied = report.transitions.iter().filter(|t| t.applied).count(),
            skipped = report.skipped.len(),
            "Order reconciled"
        ),
        Err(e) => tracing::error!(order_id = %guid, error = %e, "Order reconciliation failed"),
    }

    Redirect::to(&target)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use uniteller_core::entities::PaymentStatus;

    use crate::api::testing::{StubStatuses, TestApp};

    fn success_request(order_id: &str) -> Request<Body> {
        Request::get(format!("/Plugins/Uniteller/Success?Order_ID={order_id}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn reported_paid_is_applied_before_redirect() {
        let app = TestApp::with_statuses(StubStatuses::reporting(&["PAID"])).await;
        let order = app.add_order(PaymentStatus::Pending).await;

        let response = app
            .router()
            .oneshot(success_request(&order.guid.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            format!("https://shop.example/checkout/completed/{}", order.id).as_str()
        );
        let stored = app.orders.get(order.guid).await.unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
        assert_eq!(app.statuses.query_count(), 1);
    }

    #[tokio::test]
    async fn paid_order_is_not_queried() {
        let app = TestApp::with_statuses(StubStatuses::reporting(&["CANCELED"])).await;
        let order = app.add_order(PaymentStatus::Paid).await;

        app.router()
            .oneshot(success_request(&order.guid.to_string()))
            .await
            .unwrap();
        assert_eq!(app.statuses.query_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_still_redirects() {
        let app = TestApp::with_statuses(StubStatuses::failing("connection refused")).await;
        let order = app.add_order(PaymentStatus::Pending).await;

        let response = app
            .router()
            .oneshot(success_request(&order.guid.to_string()))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::LOCATION],
            format!("https://shop.example/checkout/completed/{}", order.id).as_str()
        );
        let stored = app.orders.get(order.guid).await.unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_order_goes_home_without_query() {
        let app = TestApp::with_statuses(StubStatuses::reporting(&["PAID"])).await;

        let response = app
            .router()
            .oneshot(success_request(&uuid::Uuid::new_v4().to_string()))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "https://shop.example/");
        assert_eq!(app.statuses.query_count(), 0);
    }
}
