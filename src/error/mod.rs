mod geomark;

pub use geomark::{ApiErrorBody, ApiErrorObject, GeomarkError};
