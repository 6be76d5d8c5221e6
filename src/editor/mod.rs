//! Admin map editor.
//!
//! [`EditorState`] is the model of the widget: three form fields, one map view
//! and at most one draggable marker. The metabox is rendered from
//! [`EditorState::initial`], and the browser script in [`assets`] runs the same
//! transitions client-side.

pub mod assets;
pub mod metabox;

use crate::config::MapConfig;
use crate::render::MapPoint;
use geomark_schema::{AddressSearchResponse, LocationRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: MapPoint,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorDefaults {
    pub center: MapPoint,
    pub default_zoom: u8,
    pub street_zoom: u8,
}

impl EditorDefaults {
    pub fn from_config(cfg: &MapConfig) -> Self {
        Self {
            center: MapPoint {
                lat: cfg.default_center.lat,
                lng: cfg.default_center.lng,
            },
            default_zoom: cfg.default_zoom,
            street_zoom: cfg.street_zoom,
        }
    }

    fn default_view(&self) -> MapView {
        MapView {
            center: self.center,
            zoom: self.default_zoom,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorFields {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorNotice {
    AddressNotFound,
}

/// What happened to a geocode reply or failure handed to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchApplied {
    Applied,
    NotFound,
    /// Not the latest outstanding search; ignored.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub fields: EditorFields,
    pub view: MapView,
    pub marker: Option<MapPoint>,
    pub notice: Option<EditorNotice>,
    defaults: EditorDefaults,
    last_seq: u64,
    pending: Option<u64>,
}

impl EditorState {
    /// Marker and street zoom on a stored, parseable coordinate; otherwise the
    /// default view with no marker.
    pub fn initial(defaults: EditorDefaults, record: Option<&LocationRecord>) -> Self {
        let fields = record
            .map(|r| EditorFields {
                address: r.address.clone(),
                latitude: r.latitude.clone(),
                longitude: r.longitude.clone(),
            })
            .unwrap_or_default();

        let mut state = Self {
            fields,
            view: defaults.default_view(),
            marker: None,
            notice: None,
            defaults,
            last_seq: 0,
            pending: None,
        };

        if let Some(point) = record.and_then(MapPoint::from_record) {
            state.place_marker(point);
        }
        state
    }

    pub fn pending_search(&self) -> Option<u64> {
        self.pending
    }

    /// Marker dropped at `(lat, lng)`. The address is left as last typed.
    pub fn drag_end(&mut self, lat: f64, lng: f64) {
        self.marker = Some(MapPoint { lat, lng });
        self.fields.latitude = format!("{lat:.6}");
        self.fields.longitude = format!("{lng:.6}");
    }

    /// Starts a lookup and returns its tag. Earlier outstanding lookups become stale.
    pub fn search_submit(&mut self, address: &str) -> u64 {
        self.last_seq += 1;
        self.pending = Some(self.last_seq);
        self.fields.address = address.to_string();
        self.notice = None;
        self.last_seq
    }

    pub fn search_resolved(&mut self, reply: &AddressSearchResponse) -> SearchApplied {
        if reply.seq.is_none() || reply.seq != self.pending {
            return SearchApplied::Stale;
        }
        self.pending = None;

        let point = reply
            .found
            .then(|| {
                let lat = reply.latitude.parse::<f64>().ok()?;
                let lng = reply.longitude.parse::<f64>().ok()?;
                Some(MapPoint { lat, lng })
            })
            .flatten();

        match point {
            Some(point) => {
                self.place_marker(point);
                self.fields.latitude.clone_from(&reply.latitude);
                self.fields.longitude.clone_from(&reply.longitude);
                SearchApplied::Applied
            }
            None => {
                self.notice = Some(EditorNotice::AddressNotFound);
                SearchApplied::NotFound
            }
        }
    }

    /// Lookup `seq` failed in transport. Treated as not found when it is the
    /// latest outstanding search; ignored otherwise.
    pub fn search_failed(&mut self, seq: u64) -> SearchApplied {
        if self.pending != Some(seq) {
            return SearchApplied::Stale;
        }
        self.pending = None;
        self.notice = Some(EditorNotice::AddressNotFound);
        SearchApplied::NotFound
    }

    /// Blanks the fields, drops the marker and returns to the default view.
    pub fn clear(&mut self) {
        self.fields = EditorFields::default();
        self.marker = None;
        self.notice = None;
        self.pending = None;
        self.view = self.defaults.default_view();
    }

    fn place_marker(&mut self, point: MapPoint) {
        self.marker = Some(point);
        self.view = MapView {
            center: point,
            zoom: self.defaults.street_zoom,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> EditorDefaults {
        EditorDefaults::from_config(&MapConfig::default())
    }

    fn reply(seq: u64, lat: &str, lng: &str) -> AddressSearchResponse {
        AddressSearchResponse {
            latitude: lat.into(),
            longitude: lng.into(),
            found: !lat.is_empty(),
            seq: Some(seq),
        }
    }

    #[test]
    fn stored_location_centers_at_street_zoom() {
        let rec = LocationRecord::new("1600 Pennsylvania Ave", "38.897", "-77.036");
        let state = EditorState::initial(defaults(), Some(&rec));
        let point = MapPoint {
            lat: 38.897,
            lng: -77.036,
        };
        assert_eq!(state.marker, Some(point));
        assert_eq!(state.view.center, point);
        assert_eq!(state.view.zoom, 16);
        assert_eq!(state.fields.address, "1600 Pennsylvania Ave");
    }

    #[test]
    fn no_location_shows_default_view() {
        let state = EditorState::initial(defaults(), None);
        assert_eq!(state.marker, None);
        assert_eq!(state.view.center, MapPoint { lat: 37.5, lng: -97.7 });
        assert_eq!(state.view.zoom, 4);
        assert_eq!(state.fields, EditorFields::default());
    }

    #[test]
    fn drag_rounds_to_six_places_and_keeps_address() {
        let rec = LocationRecord::new("Old address", "1", "2");
        let mut state = EditorState::initial(defaults(), Some(&rec));
        state.drag_end(38.897_676_34, -77.036_529_87);
        assert_eq!(state.fields.latitude, "38.897676");
        assert_eq!(state.fields.longitude, "-77.036530");
        assert_eq!(state.fields.address, "Old address");
    }

    #[test]
    fn search_reply_moves_marker_and_fields() {
        let mut state = EditorState::initial(defaults(), None);
        let seq = state.search_submit("1600 Pennsylvania Ave");
        assert_eq!(state.pending_search(), Some(seq));

        let applied = state.search_resolved(&reply(seq, "38.897", "-77.036"));
        assert_eq!(applied, SearchApplied::Applied);
        assert_eq!(state.fields.latitude, "38.897");
        assert_eq!(state.fields.longitude, "-77.036");
        assert_eq!(state.view.zoom, 16);
        assert_eq!(state.pending_search(), None);
    }

    #[test]
    fn stale_reply_is_dropped() {
        let mut state = EditorState::initial(defaults(), None);
        let first = state.search_submit("Paris");
        let second = state.search_submit("London");

        assert_eq!(
            state.search_resolved(&reply(first, "48.85", "2.35")),
            SearchApplied::Stale
        );
        assert_eq!(state.marker, None);

        assert_eq!(
            state.search_resolved(&reply(second, "51.5", "-0.12")),
            SearchApplied::Applied
        );
        assert_eq!(state.fields.latitude, "51.5");
    }

    #[test]
    fn stale_failure_does_not_swallow_latest_reply() {
        let mut state = EditorState::initial(defaults(), None);
        let first = state.search_submit("Paris");
        let second = state.search_submit("White House");

        assert_eq!(state.search_failed(first), SearchApplied::Stale);
        assert_eq!(state.notice, None);
        assert_eq!(state.pending_search(), Some(second));

        assert_eq!(
            state.search_resolved(&reply(second, "38.8977", "-77.0365")),
            SearchApplied::Applied
        );
        assert_eq!(state.fields.latitude, "38.8977");
        assert_eq!(state.fields.longitude, "-77.0365");
        assert_eq!(state.notice, None);
    }

    #[test]
    fn latest_failure_raises_notice() {
        let mut state = EditorState::initial(defaults(), None);
        let seq = state.search_submit("White House");
        assert_eq!(state.search_failed(seq), SearchApplied::NotFound);
        assert_eq!(state.notice, Some(EditorNotice::AddressNotFound));
        assert_eq!(state.pending_search(), None);
        assert_eq!(state.search_failed(seq), SearchApplied::Stale);
    }

    #[test]
    fn not_found_leaves_fields_and_raises_notice() {
        let rec = LocationRecord::new("Somewhere", "10.0", "20.0");
        let mut state = EditorState::initial(defaults(), Some(&rec));
        let seq = state.search_submit("nowhere at all");
        assert_eq!(
            state.search_resolved(&reply(seq, "", "")),
            SearchApplied::NotFound
        );
        assert_eq!(state.fields.latitude, "10.0");
        assert_eq!(state.fields.longitude, "20.0");
        assert_eq!(state.notice, Some(EditorNotice::AddressNotFound));
    }

    #[test]
    fn clear_resets_and_orphans_pending_search() {
        let rec = LocationRecord::new("Somewhere", "10.0", "20.0");
        let mut state = EditorState::initial(defaults(), Some(&rec));
        let seq = state.search_submit("Elsewhere");
        state.clear();

        assert_eq!(state.fields, EditorFields::default());
        assert_eq!(state.marker, None);
        assert_eq!(state.view.zoom, 4);
        assert_eq!(
            state.search_resolved(&reply(seq, "1", "2")),
            SearchApplied::Stale
        );
    }
}
