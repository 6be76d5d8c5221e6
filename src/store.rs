//! Coordinate store: one [`LocationRecord`] per content item, kept in item metadata.

use crate::db::DbActorHandle;
use crate::error::GeomarkError;
use async_trait::async_trait;
use geomark_schema::LocationRecord;
use tracing::warn;

/// Metadata key the record lives under.
pub const LOCATION_META_KEY: &str = "_wdsgmap_details";

#[async_trait]
pub trait CoordinateStore: Send + Sync {
    /// Complete record for the item, or `None` when nothing (or only part of one) is stored.
    async fn get(&self, item_id: i64) -> Result<Option<LocationRecord>, GeomarkError>;

    /// Overwrites the item's record. Last write wins.
    async fn set(&self, item_id: i64, record: &LocationRecord) -> Result<(), GeomarkError>;

    /// Removes the item's record; `true` if one existed.
    async fn delete(&self, item_id: i64) -> Result<bool, GeomarkError>;
}

#[async_trait]
impl CoordinateStore for DbActorHandle {
    async fn get(&self, item_id: i64) -> Result<Option<LocationRecord>, GeomarkError> {
        let Some(row) = self.get_meta(item_id, LOCATION_META_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<LocationRecord>(&row.meta_value) {
            Ok(record) => Ok(record.into_complete()),
            Err(e) => {
                warn!(item_id, error = %e, "Stored location is not a valid record; ignoring");
                Ok(None)
            }
        }
    }

    async fn set(&self, item_id: i64, record: &LocationRecord) -> Result<(), GeomarkError> {
        let value = serde_json::to_string(record)?;
        self.upsert_meta(item_id, LOCATION_META_KEY, value).await
    }

    async fn delete(&self, item_id: i64) -> Result<bool, GeomarkError> {
        self.delete_meta(item_id, LOCATION_META_KEY).await
    }
}
