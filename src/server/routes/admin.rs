use crate::controller::{LOCATION_NONCE_ACTION, LocationForm, SaveContext};
use crate::editor::metabox::{MetaboxContext, render_editor_page};
use crate::editor::{EditorDefaults, EditorState};
use crate::error::GeomarkError;
use crate::server::guards::auth::{RequireAdminAuth, admin_session_cookie};
use crate::server::router::GeomarkState;
use crate::server::routes::ajax::AJAX_PATH;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::debug;

pub fn router() -> Router<GeomarkState> {
    Router::new().route(
        "/admin/{content_type}/{item_id}/location",
        get(location_editor).post(location_save),
    )
}

fn editor_path(content_type: &str, item_id: i64) -> String {
    format!("/admin/{content_type}/{item_id}/location")
}

fn ensure_location_box(state: &GeomarkState, content_type: &str) -> Result<(), GeomarkError> {
    if state.content_types.has_location_box(content_type) {
        Ok(())
    } else {
        Err(GeomarkError::UnsupportedContentType(content_type.to_string()))
    }
}

/// GET /admin/{content_type}/{item_id}/location
///
/// Edit screen with the location metabox. Refreshes the admin session cookie
/// so the browser's form post and ajax lookups authenticate.
async fn location_editor(
    State(state): State<GeomarkState>,
    Path((content_type, item_id)): Path<(String, i64)>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, GeomarkError> {
    ensure_location_box(&state, &content_type)?;

    let record = state.store.get(item_id).await?;
    let editor = EditorState::initial(
        EditorDefaults::from_config(&state.map_cfg),
        record.as_ref(),
    );

    let nonce = state.controller.nonces().issue(LOCATION_NONCE_ACTION);
    let save_url = editor_path(&content_type, item_id);
    let page = render_editor_page(
        &state.map_cfg,
        &editor,
        &MetaboxContext {
            nonce: &nonce,
            ajax_url: AJAX_PATH,
            save_url: &save_url,
        },
    );

    let jar = jar.add(admin_session_cookie(
        &state.admin_key,
        !state.insecure_cookie,
    ));
    Ok((jar, Html(page)))
}

/// POST /admin/{content_type}/{item_id}/location
///
/// Runs the save hook and sends the browser back to the edit screen.
/// Rejected saves (nonce, autosave, permission) look the same as accepted ones.
async fn location_save(
    State(state): State<GeomarkState>,
    Path((content_type, item_id)): Path<(String, i64)>,
    auth: RequireAdminAuth,
    Form(form): Form<LocationForm>,
) -> Result<Redirect, GeomarkError> {
    ensure_location_box(&state, &content_type)?;

    let ctx = SaveContext {
        user: auth.user,
        autosave: form.is_autosave(),
    };
    let returned = state.controller.on_save(item_id, &ctx, &form).await;
    debug!(item_id = returned, content_type = %content_type, "Save hook returned");

    Ok(Redirect::to(&editor_path(&content_type, returned)))
}
