pub mod config;
pub mod controller;
pub mod db;
pub mod editor;
pub mod error;
pub mod geocode;
pub mod hooks;
pub mod render;
pub mod server;
pub mod store;

pub use error::GeomarkError;
pub use geomark_schema::LocationRecord;
pub use store::CoordinateStore;
