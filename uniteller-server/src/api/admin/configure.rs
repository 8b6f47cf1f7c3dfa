use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uniteller_core::config::{DEFAULT_STORE_SCOPE, OverrideFlags};
use uniteller_sdk::config::ProviderSettings;

use super::AdminApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub store_id: u32,
}

/// Settings as seen from one store scope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigureModel {
    #[serde(default)]
    pub store_id: u32,
    /// Effective values in this scope.
    pub values: ProviderSettings,
    /// Fields this scope overrides. Ignored for the default scope.
    #[serde(default)]
    pub overrides: OverrideFlags,
}

/// `GET /Admin/PaymentUniteller/Configure`: load settings for a store scope.
pub(super) async fn load_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(scope): Query<ScopeQuery>,
) -> Json<ConfigureModel> {
    let settings = state.config.settings.read().await;
    Json(ConfigureModel {
        store_id: scope.store_id,
        values: settings.resolve(scope.store_id),
        overrides: settings.overrides_for(scope.store_id),
    })
}

/// `POST /Admin/PaymentUniteller/Configure`: save settings for a store scope.
///
/// The new settings are written to the config file before they take effect;
/// callbacks keep reading the old ones until then.
pub(super) async fn save_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(model): Json<ConfigureModel>,
) -> Result<Json<ConfigureModel>, AdminApiError> {
    let ConfigureModel {
        store_id,
        values,
        overrides,
    } = model;
    let settings = state
        .config_loader
        .update_settings(&state.config.settings, |settings| {
            settings.apply(store_id, values, overrides)
        })
        .await
        .map_err(AdminApiError::Persist)?;

    tracing::info!(
        store_id,
        default_scope = store_id == DEFAULT_STORE_SCOPE,
        "Provider settings updated"
    );

    Ok(Json(ConfigureModel {
        store_id,
        values: settings.resolve(store_id),
        overrides: settings.overrides_for(store_id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::api::extractors::ADMIN_AUTH_HEADER;
    use crate::api::testing::{ADMIN_SECRET, TestApp, body_string};

    fn get_request(uri: &str, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(secret) = secret {
            builder = builder.header(ADMIN_AUTH_HEADER, secret);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_request(model: serde_json::Value) -> Request<Body> {
        Request::post("/Admin/PaymentUniteller/Configure")
            .header(ADMIN_AUTH_HEADER, ADMIN_SECRET)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(model.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn requires_admin_secret() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(get_request("/Admin/PaymentUniteller/Configure", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router()
            .oneshot(get_request("/Admin/PaymentUniteller/Configure", Some("nope")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn loads_default_scope() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(get_request(
                "/Admin/PaymentUniteller/Configure",
                Some(ADMIN_SECRET),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let model: ConfigureModel = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(model.store_id, 0);
        assert_eq!(model.values.shop_idp, "00001234");
        assert_eq!(model.overrides, OverrideFlags::default());
    }

    #[tokio::test]
    async fn store_override_is_saved_and_persisted() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(post_request(serde_json::json!({
                "store_id": 3,
                "values": {
                    "shop_idp": "00001234",
                    "login": "shop-login",
                    "password": "store-three",
                    "additional_fee": "1.5",
                    "additional_fee_percentage": false
                },
                "overrides": { "password": true, "additional_fee": true }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let model: ConfigureModel = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(model.values.password, "store-three");
        assert!(model.overrides.password && model.overrides.additional_fee);
        assert!(!model.overrides.login);

        let settings = app.state.config.settings.read().await.clone();
        assert_eq!(settings.resolve(3).additional_fee, dec!(1.5));
        assert_eq!(settings.resolve(0).password, "secret");

        let file = std::fs::read_to_string(app.config_file.path()).unwrap();
        assert!(file.contains("store-three"));
    }

    #[tokio::test]
    async fn default_scope_save_changes_callbacks_settings() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(post_request(serde_json::json!({
                "values": {
                    "shop_idp": "00009999",
                    "login": "new-login",
                    "password": "rotated"
                }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resolved = app.state.config.resolved_settings().await;
        assert_eq!(resolved.password, "rotated");
        assert_eq!(resolved.shop_idp, "00009999");
    }
}
