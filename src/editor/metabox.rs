use super::EditorState;
use crate::config::MapConfig;
use crate::controller::{
    ADDRESS_FIELD, AUTOSAVE_FIELD, LATITUDE_FIELD, LONGITUDE_FIELD, NONCE_FIELD,
};
use crate::render::{
    ADMIN_MAP_HEIGHT, MAP_CANVAS_ID, MAP_SCRIPT_HANDLE, MapSize, esc_attr, map_container,
};

pub const ADMIN_SCRIPT_PATH: &str = "/assets/wdsgmap-admin.js";

/// Per-request values the metabox needs besides the editor state.
pub struct MetaboxContext<'a> {
    pub nonce: &'a str,
    pub ajax_url: &'a str,
    pub save_url: &'a str,
}

/// The location panel: map, address lookup, hidden coordinate fields and nonce.
pub fn render_metabox(state: &EditorState, ctx: &MetaboxContext<'_>) -> String {
    let size = MapSize {
        height: ADMIN_MAP_HEIGHT.to_string(),
        ..MapSize::default()
    };
    let defaults = &state.defaults;

    format!(
        r##"<div id="wdsgmap_meta_box" class="postbox">
<h4>Enter an address to plot on a map.</h4>
<div style="padding-bottom:20px;" class="wdsgmap_admin_map"
     data-ajax-url="{ajax_url}"
     data-default-lat="{default_lat}" data-default-lng="{default_lng}"
     data-default-zoom="{default_zoom}" data-street-zoom="{street_zoom}"
     data-center-lat="{center_lat}" data-center-lng="{center_lng}" data-zoom="{zoom}"
     data-marker="{has_marker}">
{container}
</div>
<p id="wdsgmap_notice" class="notice" role="status"{notice_hidden}>Address not found.</p>
<table style="padding-bottom:10px">
    <tr>
        <th scope="row" style="text-align:right;"><label for="{address_field}">Address Lookup</label></th>
        <td>
            <input type="hidden" name="{nonce_field}" value="{nonce}" />
            <input type="hidden" name="{autosave_field}" value="" />
            <input type="text" id="{address_field}" name="{address_field}" size="60" value="{address}" />
            <a id="wdsgmap_address_search_submit" class="button" href="#">Search</a>
            <a id="wdsgmap_address_clear" class="button" href="#">Clear Map</a>
            <input type="hidden" id="{latitude_field}" name="{latitude_field}" value="{latitude}" />
            <input type="hidden" id="{longitude_field}" name="{longitude_field}" value="{longitude}" />
        </td>
    </tr>
</table>
</div>"##,
        ajax_url = esc_attr(ctx.ajax_url),
        default_lat = defaults.center.lat,
        default_lng = defaults.center.lng,
        default_zoom = defaults.default_zoom,
        street_zoom = defaults.street_zoom,
        center_lat = state.view.center.lat,
        center_lng = state.view.center.lng,
        zoom = state.view.zoom,
        has_marker = u8::from(state.marker.is_some()),
        container = map_container(MAP_CANVAS_ID, &size),
        notice_hidden = if state.notice.is_some() { "" } else { " hidden" },
        nonce_field = NONCE_FIELD,
        autosave_field = AUTOSAVE_FIELD,
        address_field = ADDRESS_FIELD,
        latitude_field = LATITUDE_FIELD,
        longitude_field = LONGITUDE_FIELD,
        nonce = esc_attr(ctx.nonce),
        address = esc_attr(&state.fields.address),
        latitude = esc_attr(&state.fields.latitude),
        longitude = esc_attr(&state.fields.longitude),
    )
}

/// Standalone edit screen wrapping the metabox in its save form.
pub fn render_editor_page(
    cfg: &MapConfig,
    state: &EditorState,
    ctx: &MetaboxContext<'_>,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>Location Map</title>
</head>
<body>
<form method="post" action="{save_url}">
{metabox}
<p><button type="submit" class="button button-primary">Save</button></p>
</form>
<script type="text/javascript" id="{map_handle}-js" src="{map_script}"></script>
<script type="text/javascript" src="{admin_script}"></script>
</body>
</html>
"#,
        save_url = esc_attr(ctx.save_url),
        metabox = render_metabox(state, ctx),
        map_handle = MAP_SCRIPT_HANDLE,
        map_script = esc_attr(&cfg.map_script_url),
        admin_script = ADMIN_SCRIPT_PATH,
    )
}
