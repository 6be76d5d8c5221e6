use crate::server::router::GeomarkState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde_json::json;
use subtle::ConstantTimeEq;
use time::Duration;

/// Encrypted cookie carrying the admin session for browser form posts and ajax.
pub const ADMIN_SESSION_COOKIE: &str = "geomark_admin";

/// Principal name recorded for key-authenticated requests.
pub const ADMIN_USER: &str = "admin";

fn extract_header_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(k) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Some(k.to_string());
    }
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

fn extract_query_token(query: Option<&str>) -> Option<String> {
    query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "key")
            .map(|(_, v)| v.into_owned())
    })
}

/// Authenticated admin context (the platform's generic admin privilege).
#[derive(Debug, Clone)]
pub struct RequireAdminAuth {
    pub user: String,
}

impl FromRequestParts<GeomarkState> for RequireAdminAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GeomarkState,
    ) -> Result<Self, Self::Rejection> {
        let explicit =
            extract_header_token(&parts.headers).or_else(|| extract_query_token(parts.uri.query()));

        let token = match explicit {
            Some(t) => Some(t),
            None => {
                let Ok(jar) = PrivateCookieJar::<Key>::from_request_parts(parts, state).await;
                jar.get(ADMIN_SESSION_COOKIE).map(|c| c.value().to_string())
            }
        };

        match token {
            Some(key) => {
                let expected = state.admin_key.as_ref();
                if key.as_bytes().ct_eq(expected.as_bytes()).into() {
                    Ok(RequireAdminAuth {
                        user: ADMIN_USER.to_string(),
                    })
                } else {
                    Err(AuthError::InvalidKey)
                }
            }
            None => Err(AuthError::MissingKey),
        }
    }
}

/// Session cookie set once the admin opens the editor with a valid key.
pub fn admin_session_cookie(admin_key: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_SESSION_COOKIE, admin_key.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::hours(8))
        .build()
}

pub enum AuthError {
    MissingKey,
    InvalidKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, reason) = match self {
            AuthError::MissingKey => (StatusCode::UNAUTHORIZED, "Missing admin key"),
            AuthError::InvalidKey => (StatusCode::UNAUTHORIZED, "Invalid admin key"),
        };
        (
            status,
            Json(json!({ "error": "unauthorized", "reason": reason })),
        )
            .into_response()
    }
}
