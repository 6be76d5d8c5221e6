use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbItemMeta {
    pub id: i64,
    pub item_id: i64,
    pub meta_key: String,
    /// Raw JSON text; decoding is up to the caller.
    pub meta_value: String,
    pub updated_at: DateTime<Utc>,
}
