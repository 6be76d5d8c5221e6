//! Wire and storage shapes shared by the geomark service.
//!
//! - `geocode`: the upstream geocoder's JSON response.
//! - `ajax`: the address-search action exchanged with the admin editor.
//! - `location`: the metadata value persisted per content item.

pub mod ajax;
pub mod geocode;
pub mod location;

pub use ajax::{ADDRESS_SEARCH_ACTION, AddressSearchRequest, AddressSearchResponse};
pub use geocode::{GeocodeResponse, Placemark, PlacemarkPoint};
pub use location::LocationRecord;
