//! Location form controller: guards, sanitizes and persists a submitted location.

pub mod nonce;
pub mod sanitize;

pub use nonce::{LOCATION_NONCE_ACTION, NonceRegistry};
pub use sanitize::sanitize_text_field;

use crate::error::GeomarkError;
use crate::hooks::PermissionPolicy;
use crate::store::CoordinateStore;
use geomark_schema::LocationRecord;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const NONCE_FIELD: &str = "wdsgmap_nonce";
pub const ADDRESS_FIELD: &str = "wdsgmap_address";
pub const LATITUDE_FIELD: &str = "wdsgmap_latitude";
pub const LONGITUDE_FIELD: &str = "wdsgmap_longitude";
pub const AUTOSAVE_FIELD: &str = "doing_autosave";

/// Raw submitted form. Every field is optional; missing reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationForm {
    #[serde(rename = "wdsgmap_nonce", default)]
    pub nonce: Option<String>,
    #[serde(rename = "wdsgmap_address", default)]
    pub address: Option<String>,
    #[serde(rename = "wdsgmap_latitude", default)]
    pub latitude: Option<String>,
    #[serde(rename = "wdsgmap_longitude", default)]
    pub longitude: Option<String>,
    #[serde(rename = "doing_autosave", default)]
    pub doing_autosave: Option<String>,
}

impl LocationForm {
    pub fn is_autosave(&self) -> bool {
        self.doing_autosave
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
    }

    /// Sanitized record, or `None` unless all three fields survive sanitizing non-empty.
    pub fn sanitized_record(&self) -> Option<LocationRecord> {
        let field = |v: &Option<String>| sanitize_text_field(v.as_deref().unwrap_or_default());
        LocationRecord::new(
            field(&self.address),
            field(&self.latitude),
            field(&self.longitude),
        )
        .into_complete()
    }
}

#[derive(Debug, Clone)]
pub struct SaveContext {
    /// Acting user, as established by the auth layer.
    pub user: String,
    pub autosave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(LocationRecord),
    /// Some field was empty; any stored record was removed.
    Cleared { removed: bool },
    InvalidNonce,
    Autosave,
    Forbidden,
}

#[derive(Clone)]
pub struct LocationController {
    store: Arc<dyn CoordinateStore>,
    nonces: NonceRegistry,
    permissions: Arc<dyn PermissionPolicy>,
}

impl LocationController {
    pub fn new(
        store: Arc<dyn CoordinateStore>,
        nonces: NonceRegistry,
        permissions: Arc<dyn PermissionPolicy>,
    ) -> Self {
        Self {
            store,
            nonces,
            permissions,
        }
    }

    pub fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }

    /// Save hook. Always hands back `item_id`; guard failures and storage
    /// errors leave the stored record untouched and are only logged.
    pub async fn on_save(&self, item_id: i64, ctx: &SaveContext, form: &LocationForm) -> i64 {
        match self.save_location(item_id, ctx, form).await {
            Ok(outcome) => debug!(item_id, ?outcome, "Location save processed"),
            Err(e) => error!(item_id, error = %e, "Location save failed"),
        }
        item_id
    }

    pub async fn save_location(
        &self,
        item_id: i64,
        ctx: &SaveContext,
        form: &LocationForm,
    ) -> Result<SaveOutcome, GeomarkError> {
        let nonce = form.nonce.as_deref().unwrap_or_default();
        if !self.nonces.verify(nonce, LOCATION_NONCE_ACTION) {
            return Ok(SaveOutcome::InvalidNonce);
        }

        if ctx.autosave {
            return Ok(SaveOutcome::Autosave);
        }

        if !self.permissions.can_edit(&ctx.user, item_id) {
            return Ok(SaveOutcome::Forbidden);
        }

        match form.sanitized_record() {
            Some(record) => {
                self.store.set(item_id, &record).await?;
                info!(item_id, address = %record.address, "Location saved");
                Ok(SaveOutcome::Saved(record))
            }
            None => {
                let removed = self.store.delete(item_id).await?;
                if removed {
                    info!(item_id, "Location cleared");
                }
                Ok(SaveOutcome::Cleared { removed })
            }
        }
    }
}
