use serde::{Deserialize, Serialize};

/// Geocoder response body.
///
/// Only the fields the gateway reads are modelled; everything else in the
/// payload (`name`, `Status`, `AddressDetails`, ...) is ignored.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeocodeResponse {
    #[serde(rename = "Placemark", default)]
    pub placemarks: Vec<Placemark>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Placemark {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "Point", default)]
    pub point: Option<PlacemarkPoint>,
}

/// `coordinates` is ordered `[longitude, latitude, altitude?]`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PlacemarkPoint {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl PlacemarkPoint {
    /// Returns `(latitude, longitude)`, swapping the wire order.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => Some((*lat, *lon)),
            _ => None,
        }
    }
}

impl GeocodeResponse {
    /// Coordinates of the best match, i.e. the first placemark.
    ///
    /// `None` when the list is empty or the first entry carries no usable point.
    pub fn first_lat_lon(&self) -> Option<(f64, f64)> {
        self.placemarks
            .first()
            .and_then(|p| p.point.as_ref())
            .and_then(PlacemarkPoint::lat_lon)
    }
}
