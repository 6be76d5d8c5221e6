use serde::{Deserialize, Serialize};

/// Action name the admin editor posts to the ajax endpoint.
pub const ADDRESS_SEARCH_ACTION: &str = "wds_gmap_address_search";

/// Address lookup submitted by the admin editor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AddressSearchRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub address: String,
    /// Editor-side request tag, echoed back so the browser can drop stale replies.
    #[serde(default)]
    pub seq: Option<u64>,
}

/// Lookup result. Coordinates are decimal strings, empty when nothing was found.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AddressSearchResponse {
    pub latitude: String,
    pub longitude: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl AddressSearchResponse {
    pub fn found(latitude: f64, longitude: f64, seq: Option<u64>) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            found: true,
            seq,
        }
    }

    pub fn empty(seq: Option<u64>) -> Self {
        Self {
            seq,
            ..Default::default()
        }
    }
}
