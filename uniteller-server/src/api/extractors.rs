//! Custom Axum extractors.
//!
//! Provides:
//! - `CallbackForm`: callback fields read from the form body (urlencoded or
//!   multipart) or query string
//!   (used by the provider callback).
//! - `OrderReference`: the `Order_ID` query parameter as an order guid
//!   (used by the shopper-facing pages).
//! - `AdminAuth`: checks the `Uniteller-Admin-Authorization` header against
//!   the hashed admin secret (used by the Admin API).

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Request},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use uniteller_sdk::objects::CallbackFields;
use uniteller_sdk::objects::callback::ORDER_ID_KEY;
use uuid::Uuid;

use crate::state::AppState;

/// Header carrying the plaintext admin secret.
pub const ADMIN_AUTH_HEADER: &str = "Uniteller-Admin-Authorization";

const MAX_CALLBACK_BODY: usize = 64 * 1024;

fn parse_pairs(input: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(input).unwrap_or_default()
}

/// Merge repeated keys into one comma-joined value, keeping first-seen order.
fn join_repeated(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut joined: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match joined.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => joined.push((key, value)),
        }
    }
    joined
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        BodyKind::UrlEncoded
    } else if essence.eq_ignore_ascii_case("multipart/form-data") {
        BodyKind::Multipart
    } else {
        BodyKind::Other
    }
}

async fn read_urlencoded(req: Request) -> Vec<(String, String)> {
    match axum::body::to_bytes(req.into_body(), MAX_CALLBACK_BODY).await {
        Ok(bytes) => parse_pairs(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable callback body");
            Vec::new()
        }
    }
}

/// Text parts of a multipart body. File parts are not form fields.
async fn read_multipart<S: Send + Sync>(req: Request, state: &S) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable multipart callback body");
            return pairs;
        }
    };
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => pairs.push((name, value)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Unreadable multipart callback field");
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable multipart callback body");
                break;
            }
        }
    }
    pairs
}

// ---------------------------------------------------------------------------
// CallbackForm
// ---------------------------------------------------------------------------

/// Callback fields, accepted over GET or POST.
///
/// Form fields come from an `application/x-www-form-urlencoded` or a
/// `multipart/form-data` body and win over the same key in the query
/// string. A key sent more than once reads as its values joined with `,`.
/// Unreadable input counts as absent, so this extractor never rejects; the
/// callback flow answers with a `FAIL` reply instead.
pub struct CallbackForm(pub CallbackFields);

impl<S: Send + Sync> FromRequest<S> for CallbackForm {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().map(parse_pairs).unwrap_or_default();

        let form = match body_kind(&req) {
            BodyKind::UrlEncoded => read_urlencoded(req).await,
            BodyKind::Multipart => read_multipart(req, state).await,
            BodyKind::Other => Vec::new(),
        };

        Ok(CallbackForm(CallbackFields::from_pairs(
            &join_repeated(form),
            &join_repeated(query),
        )))
    }
}

// ---------------------------------------------------------------------------
// OrderReference
// ---------------------------------------------------------------------------

/// The `Order_ID` query parameter, if it is a valid guid.
pub struct OrderReference(pub Option<Uuid>);

impl<S: Send + Sync> FromRequestParts<S> for OrderReference {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let guid = parts
            .uri
            .query()
            .map(parse_pairs)
            .unwrap_or_default()
            .into_iter()
            .find(|(k, _)| k == ORDER_ID_KEY)
            .and_then(|(_, v)| Uuid::parse_str(&v).ok());
        Ok(OrderReference(guid))
    }
}

// ---------------------------------------------------------------------------
// AdminAuth
// ---------------------------------------------------------------------------

/// Proof that the request carried the admin secret.
pub struct AdminAuth;

#[derive(Debug)]
pub enum AdminAuthError {
    MissingHeader,
    InvalidSecret,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AdminAuthError::MissingHeader => "missing Uniteller-Admin-Authorization header",
            AdminAuthError::InvalidSecret => "invalid admin secret",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidSecret)?;

        if state.config.admin.read().await.verify_secret(secret) {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected admin request with a wrong secret");
            Err(AdminAuthError::InvalidSecret)
        }
    }
}
