use crate::controller::sanitize_text_field;
use crate::server::router::GeomarkState;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use geomark_schema::{ADDRESS_SEARCH_ACTION, AddressSearchRequest};
use tracing::debug;

pub const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

pub fn router() -> Router<GeomarkState> {
    Router::new().route(AJAX_PATH, post(ajax_post_handler).get(ajax_get_handler))
}

/// POST /wp-admin/admin-ajax.php (form-encoded)
async fn ajax_post_handler(
    State(state): State<GeomarkState>,
    Form(req): Form<AddressSearchRequest>,
) -> Response {
    dispatch(&state, req).await
}

/// GET /wp-admin/admin-ajax.php?action=...&address=...
async fn ajax_get_handler(
    State(state): State<GeomarkState>,
    Query(req): Query<AddressSearchRequest>,
) -> Response {
    dispatch(&state, req).await
}

async fn dispatch(state: &GeomarkState, req: AddressSearchRequest) -> Response {
    if req.action != ADDRESS_SEARCH_ACTION {
        debug!(action = %req.action, "Unknown ajax action");
        return (StatusCode::BAD_REQUEST, "0").into_response();
    }

    let address = sanitize_text_field(&req.address);
    let outcome = state.gateway.resolve(&address).await;
    Json(outcome.into_response(req.seq)).into_response()
}
