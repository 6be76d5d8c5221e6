use serde::{Deserialize, Serialize};
use url::Url;

/// Map widget, renderer and geocoder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    /// Geocoder endpoint; the address goes into the `q` query parameter.
    pub geocode_url: Url,

    /// Map library loaded by both the admin editor and public pages.
    pub map_script_url: String,

    /// View shown when an item has no location (continental US).
    pub default_center: MapCenter,

    /// Zoom level for `default_center`.
    pub default_zoom: u8,

    /// Zoom level used whenever a marker is shown.
    pub street_zoom: u8,

    /// Content types that get the location metabox.
    pub content_types: Vec<String>,

    /// Host-wide size for public maps rendered without explicit attributes.
    pub size_override: Option<SizeOverride>,

    /// Total timeout for one geocoder request.
    pub request_timeout_secs: u64,

    /// Optional outbound proxy for the geocoder.
    pub proxy: Option<Url>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct SizeOverride {
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            geocode_url: Url::parse("http://maps.google.com/maps/geo")
                .expect("valid default geocoder url"),
            map_script_url: "https://maps.google.com/maps/api/js?sensor=false".to_string(),
            default_center: MapCenter {
                lat: 37.5,
                lng: -97.7,
            },
            default_zoom: 4,
            street_zoom: 16,
            content_types: vec!["post".to_string(), "page".to_string()],
            size_override: None,
            request_timeout_secs: 5,
            proxy: None,
        }
    }
}
