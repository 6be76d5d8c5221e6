//! SQL DDL for initializing the database schema.

/// SQLite schema includes:
/// - `item_meta` table (arbitrary key/value metadata, one (item_id, meta_key) per row)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Content item metadata
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS item_meta (
    id INTEGER PRIMARY KEY NOT NULL,
    item_id INTEGER NOT NULL,
    meta_key TEXT NOT NULL,
    meta_value TEXT NOT NULL, -- JSON
    updated_at TEXT NOT NULL, -- RFC3339
    UNIQUE(item_id, meta_key)
);

CREATE INDEX IF NOT EXISTS idx_item_meta_item ON item_meta(item_id);
"#;
