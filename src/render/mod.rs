//! Public map renderer: shortcode expansion into a read-only single-marker map.
//!
//! The coordinate to plot is always passed in; nothing is stashed between the
//! body render and the footer script.

pub mod escape;
pub mod scheduler;
pub mod shortcode;

pub use escape::{esc_attr, esc_js};
pub use scheduler::{FooterQueue, RenderScheduler};
pub use shortcode::{SHORTCODE_TAG, ShortcodeAtts, find_shortcodes};

use crate::config::MapConfig;
use crate::hooks::SizeOverridePolicy;
use geomark_schema::LocationRecord;
use tracing::debug;

/// Script handle for the map library.
pub const MAP_SCRIPT_HANDLE: &str = "google-maps";

/// Footer slot for the map init script; runs after the library tag.
pub const MAP_SCRIPT_PRIORITY: i32 = 30;

/// Container id of the first map on a page.
pub const MAP_CANVAS_ID: &str = "map_canvas";

/// Height of the admin editor map. Size overrides never apply to it.
pub const ADMIN_MAP_HEIGHT: &str = "400px";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSize {
    pub height: String,
    pub width: String,
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            height: "200px".to_string(),
            width: "100%".to_string(),
        }
    }
}

/// Plottable point; only built from coordinates that parse as numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
}

impl MapPoint {
    pub fn from_record(record: &LocationRecord) -> Option<Self> {
        let lat = record.latitude.trim().parse::<f64>().ok()?;
        let lng = record.longitude.trim().parse::<f64>().ok()?;
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

/// Id for the `n`th (0-based) map container on a page.
pub fn canvas_id(index: usize) -> String {
    if index == 0 {
        MAP_CANVAS_ID.to_string()
    } else {
        format!("{MAP_CANVAS_ID}_{}", index + 1)
    }
}

/// Sized, empty container the map library draws into.
pub fn map_container(canvas_id: &str, size: &MapSize) -> String {
    format!(
        "<div id=\"{}\" style=\"height:{}; width:{};\"></div>",
        esc_attr(canvas_id),
        esc_attr(&size.height),
        esc_attr(&size.width)
    )
}

/// Resolves the public container size.
///
/// Explicit attributes fill in over the defaults. The host override only
/// applies when neither attribute was given.
pub fn public_size(atts: &ShortcodeAtts, overrides: &dyn SizeOverridePolicy) -> MapSize {
    let defaults = MapSize::default();
    if !atts.is_custom() {
        return overrides.apply(defaults);
    }
    MapSize {
        height: atts.height.clone().unwrap_or(defaults.height),
        width: atts.width.clone().unwrap_or(defaults.width),
    }
}

/// Inline script drawing one fixed, non-draggable marker.
pub fn map_script(canvas_id: &str, point: MapPoint, zoom: u8) -> String {
    let id = esc_js(canvas_id);
    format!(
        r#"<script type="text/javascript">
(function () {{
    function init() {{
        var map = new google.maps.Map(document.getElementById('{id}'), {{
            mapTypeId: google.maps.MapTypeId.ROADMAP
        }});
        var marker = new google.maps.Marker({{
            position: new google.maps.LatLng({lat}, {lng}),
            draggable: false
        }});
        map.setCenter(marker.getPosition());
        map.setZoom({zoom});
        marker.setMap(map);
    }}
    setTimeout(init, 10);
}})();
</script>"#,
        lat = point.lat,
        lng = point.lng,
    )
}

pub struct PublicMapRenderer<'a> {
    cfg: &'a MapConfig,
    sizes: &'a dyn SizeOverridePolicy,
}

impl<'a> PublicMapRenderer<'a> {
    pub fn new(cfg: &'a MapConfig, sizes: &'a dyn SizeOverridePolicy) -> Self {
        Self { cfg, sizes }
    }

    /// Expands one shortcode. Returns an empty string and schedules nothing
    /// when the item has no plottable location.
    pub fn render_shortcode(
        &self,
        canvas_id: &str,
        atts: &ShortcodeAtts,
        record: Option<&LocationRecord>,
        scheduler: &mut dyn RenderScheduler,
    ) -> String {
        let Some(point) = record.and_then(MapPoint::from_record) else {
            return String::new();
        };

        let size = public_size(atts, self.sizes);
        scheduler.enqueue_script(MAP_SCRIPT_HANDLE, &self.cfg.map_script_url);
        scheduler.defer_footer(
            MAP_SCRIPT_PRIORITY,
            map_script(canvas_id, point, self.cfg.street_zoom),
        );
        map_container(canvas_id, &size)
    }

    /// Replaces every map shortcode in `content`; each gets its own container id.
    pub fn expand_shortcodes(
        &self,
        content: &str,
        record: Option<&LocationRecord>,
        scheduler: &mut dyn RenderScheduler,
    ) -> String {
        let matches = find_shortcodes(content);
        if matches.is_empty() {
            return content.to_string();
        }

        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;
        let mut index = 0;
        for m in &matches {
            out.push_str(&content[cursor..m.start]);
            if m.escaped {
                out.push_str(m.literal(content));
            } else {
                out.push_str(&self.render_shortcode(&canvas_id(index), &m.atts, record, scheduler));
                index += 1;
            }
            cursor = m.end;
        }
        out.push_str(&content[cursor..]);

        debug!(shortcodes = matches.len(), "Expanded map shortcodes");
        out
    }

    /// Full page fragment: expanded body followed by the scheduled footer.
    pub fn render_page(&self, content: &str, record: Option<&LocationRecord>) -> String {
        let mut queue = FooterQueue::new();
        let mut page = self.expand_shortcodes(content, record, &mut queue);
        if !queue.is_empty() {
            page.push('\n');
            page.push_str(&queue.render());
        }
        page
    }
}
