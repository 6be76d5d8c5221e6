use serde::{Deserialize, Serialize};

/// Geocoded address attached to one content item.
///
/// Stored as the JSON value of the item's `_wdsgmap_details` metadata entry.
/// A record is only meaningful when all three fields are non-empty.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct LocationRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

impl LocationRecord {
    pub fn new(
        address: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.address.is_empty() && !self.latitude.is_empty() && !self.longitude.is_empty()
    }

    /// Returns the record only if every field is set.
    pub fn into_complete(self) -> Option<Self> {
        self.is_complete().then_some(self)
    }
}
