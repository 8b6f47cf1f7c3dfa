use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use uniteller_core::{OrderError, PaymentError};
use uniteller_sdk::objects::PaymentForm;
use uniteller_sdk::objects::payment::PAYMENT_FORM_NAME;

use crate::api::extractors::OrderReference;
use crate::state::AppState;

#[derive(Debug)]
pub(super) enum RedirectPageError {
    NotFound,
    Orders(OrderError),
    Payment(PaymentError),
}

impl IntoResponse for RedirectPageError {
    fn into_response(self) -> Response {
        match self {
            RedirectPageError::NotFound => {
                (StatusCode::NOT_FOUND, "order not found").into_response()
            }
            RedirectPageError::Orders(e) => {
                tracing::error!(error = %e, "Order lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            RedirectPageError::Payment(e) => {
                tracing::error!(error = %e, "Failed to build payment form");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// `GET /Plugins/Uniteller/Redirect`: page that posts the signed payment
/// form to Uniteller as soon as it loads.
pub(super) async fn redirect(
    State(state): State<AppState>,
    OrderReference(guid): OrderReference,
) -> Result<Html<String>, RedirectPageError> {
    let guid = guid.ok_or(RedirectPageError::NotFound)?;
    let order = state
        .orders
        .get_order_by_guid(guid)
        .await
        .map_err(RedirectPageError::Orders)?
        .ok_or(RedirectPageError::NotFound)?;

    let form = state
        .payment_method
        .post_process_payment(&order)
        .await
        .map_err(RedirectPageError::Payment)?;
    let endpoint = state.config.provider.read().await.endpoints.payment_url.clone();

    tracing::info!(order_id = %guid, "Redirecting shopper to Uniteller");
    Ok(Html(payment_page(endpoint.as_str(), &form).into_string()))
}

fn payment_page(endpoint: &str, form: &PaymentForm) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Uniteller" }
            }
            body style="padding: 20px; font-family: Arial, Helvetica, Sans-Serif;" {
                h3 style="text-align: center;" { "Please wait while you are redirected to Uniteller..." }
                form name=(PAYMENT_FORM_NAME) id=(PAYMENT_FORM_NAME) action=(endpoint) method="post" {
                    @for (field, value) in form.fields() {
                        input type="hidden" name=(field) value=(value);
                    }
                    noscript {
                        input type="submit" value="Continue";
                    }
                }
                (PreEscaped(format!(
                    r#"<script type="text/javascript">document.forms["{PAYMENT_FORM_NAME}"].submit();</script>"#
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use uniteller_core::entities::PaymentStatus;

    use crate::api::testing::{TestApp, body_string};

    #[tokio::test]
    async fn page_posts_signed_form_to_payment_url() {
        let app = TestApp::new().await;
        let order = app.add_order(PaymentStatus::Pending).await;

        let response = app
            .router()
            .oneshot(
                Request::get(format!("/Plugins/Uniteller/Redirect?Order_ID={}", order.guid))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_string(response).await;
        assert!(page.contains(r#"action="https://wpay.uniteller.ru/pay/""#));
        assert!(page.contains(r#"name="PayPoint""#));
        assert!(page.contains(&format!(r#"name="Order_IDP" value="{}""#, order.guid)));
        assert!(page.contains(r#"name="Subtotal_P" value="1234.50""#));
        assert!(page.contains(r#"name="Currency" value="RUB""#));
        assert!(page.contains(
            r#"name="URL_RETURN_OK" value="https://shop.example/Plugins/Uniteller/Success""#
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let app = TestApp::new().await;
        let response = app
            .router()
            .oneshot(
                Request::get(format!(
                    "/Plugins/Uniteller/Redirect?Order_ID={}",
                    uuid::Uuid::new_v4()
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
