//! Collaborator seams the core calls into instead of ambient host hooks.

use crate::config::{MapConfig, SizeOverride};
use crate::render::MapSize;

/// Which content types carry the location metabox.
pub trait ContentTypeProvider: Send + Sync {
    fn content_types(&self) -> Vec<String>;

    fn has_location_box(&self, content_type: &str) -> bool {
        self.content_types().iter().any(|t| t == content_type)
    }
}

/// Host-wide size override for public maps rendered without explicit attributes.
pub trait SizeOverridePolicy: Send + Sync {
    fn apply(&self, size: MapSize) -> MapSize;
}

/// Decides whether a user may edit an item's location.
pub trait PermissionPolicy: Send + Sync {
    fn can_edit(&self, user: &str, item_id: i64) -> bool;
}

#[derive(Debug, Clone)]
pub struct ConfiguredContentTypes(Vec<String>);

impl ConfiguredContentTypes {
    pub fn new(types: Vec<String>) -> Self {
        Self(types)
    }

    pub fn from_config(cfg: &MapConfig) -> Self {
        Self(cfg.content_types.clone())
    }
}

impl ContentTypeProvider for ConfiguredContentTypes {
    fn content_types(&self) -> Vec<String> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverride;

impl SizeOverridePolicy for NoOverride {
    fn apply(&self, size: MapSize) -> MapSize {
        size
    }
}

/// Replaces whichever dimensions the override sets; the rest keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct FixedSize(pub SizeOverride);

impl SizeOverridePolicy for FixedSize {
    fn apply(&self, size: MapSize) -> MapSize {
        MapSize {
            height: self.0.height.clone().unwrap_or(size.height),
            width: self.0.width.clone().unwrap_or(size.width),
        }
    }
}

/// Any authenticated caller may edit any item.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAuthenticated;

impl PermissionPolicy for AllowAuthenticated {
    fn can_edit(&self, user: &str, _item_id: i64) -> bool {
        !user.is_empty()
    }
}
