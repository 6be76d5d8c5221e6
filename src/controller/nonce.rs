//! Form nonces: random single-purpose tokens that expire after a fixed window.

use base64::Engine as _;
use moka::sync::Cache;
use rand::RngCore;
use std::time::Duration;
use subtle::ConstantTimeEq;

/// Action the location form's nonce is issued for.
pub const LOCATION_NONCE_ACTION: &str = "wdsgmap_details";

const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_LIVE_NONCES: u64 = 100_000;

#[derive(Clone)]
pub struct NonceRegistry {
    issued: Cache<String, String>,
}

impl Default for NonceRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_TTL)
    }
}

impl NonceRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            issued: Cache::builder()
                .max_capacity(MAX_LIVE_NONCES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Issues a token bound to `action`. Valid until it expires.
    pub fn issue(&self, action: &str) -> String {
        // 128 bits => 22 chars base64url (no padding).
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        self.issued.insert(token.clone(), action.to_string());
        token
    }

    pub fn verify(&self, token: &str, action: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.issued
            .get(token)
            .is_some_and(|bound| bound.as_bytes().ct_eq(action.as_bytes()).into())
    }
}
