use crate::editor::assets::ADMIN_SCRIPT;
use crate::editor::metabox::ADMIN_SCRIPT_PATH;
use crate::error::GeomarkError;
use crate::render::{FooterQueue, MAP_CANVAS_ID, PublicMapRenderer, ShortcodeAtts};
use crate::server::router::GeomarkState;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;

pub fn router() -> Router<GeomarkState> {
    Router::new()
        .route("/items/{item_id}/render", post(render_content))
        .route("/items/{item_id}/map", get(render_map))
        .route(ADMIN_SCRIPT_PATH, get(admin_script))
}

/// POST /items/{item_id}/render
///
/// Body is the item's raw content; every `[wds-gmap]` in it is expanded and
/// the map scripts are appended as the page footer.
async fn render_content(
    State(state): State<GeomarkState>,
    Path(item_id): Path<i64>,
    body: String,
) -> Result<Html<String>, GeomarkError> {
    let record = state.store.get(item_id).await?;
    let renderer = PublicMapRenderer::new(&state.map_cfg, state.sizes.as_ref());
    Ok(Html(renderer.render_page(&body, record.as_ref())))
}

#[derive(Debug, Deserialize)]
struct MapQuery {
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    width: Option<String>,
}

/// GET /items/{item_id}/map?height=..&width=..
///
/// A single map as the shortcode would render it; empty when no location is stored.
async fn render_map(
    State(state): State<GeomarkState>,
    Path(item_id): Path<i64>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, GeomarkError> {
    let record = state.store.get(item_id).await?;
    let atts = ShortcodeAtts {
        height: query.height.filter(|h| !h.trim().is_empty()),
        width: query.width.filter(|w| !w.trim().is_empty()),
    };

    let renderer = PublicMapRenderer::new(&state.map_cfg, state.sizes.as_ref());
    let mut queue = FooterQueue::new();
    let mut page = renderer.render_shortcode(MAP_CANVAS_ID, &atts, record.as_ref(), &mut queue);
    if !queue.is_empty() {
        page.push('\n');
        page.push_str(&queue.render());
    }
    Ok(Html(page))
}

/// GET /assets/wdsgmap-admin.js
async fn admin_script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], ADMIN_SCRIPT)
}
