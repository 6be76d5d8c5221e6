//! Database module: the generic item-metadata table and its actor.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `actor.rs`: ractor actor owning the pool; all reads and writes go through it

pub mod actor;
pub mod models;
pub mod schema;

pub use models::DbItemMeta;
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
