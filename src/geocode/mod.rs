//! Geocode gateway: free-text address to a single best-match coordinate pair.
//!
//! One GET per lookup, no retries, no caching. Every failure mode collapses into
//! a [`GeocodeOutcome`] so callers never see an error from this layer.

use crate::config::MapConfig;
use crate::error::GeomarkError;
use geomark_schema::{AddressSearchResponse, GeocodeResponse};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const GEOCODE_USER_AGENT: &str = concat!("geomark/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinates),
    /// The service answered but had no usable placemark.
    NotFound,
    /// Transport error, non-success status or undecodable body.
    Failed(String),
}

impl GeocodeOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Found(c) => Some(*c),
            _ => None,
        }
    }

    /// Wire reply for the admin editor; empty strings unless found.
    pub fn into_response(self, seq: Option<u64>) -> AddressSearchResponse {
        match self {
            GeocodeOutcome::Found(c) => AddressSearchResponse::found(c.latitude, c.longitude, seq),
            GeocodeOutcome::NotFound | GeocodeOutcome::Failed(_) => {
                AddressSearchResponse::empty(seq)
            }
        }
    }
}

#[derive(Clone)]
pub struct GeocodeGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl GeocodeGateway {
    pub fn new(cfg: &MapConfig) -> Result<Self, GeomarkError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(GEOCODE_USER_AGENT)
            .connect_timeout(Duration::from_secs(cfg.request_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs));

        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: cfg.geocode_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves `address`; the first placemark wins.
    pub async fn resolve(&self, address: &str) -> GeocodeOutcome {
        if address.trim().is_empty() {
            return GeocodeOutcome::NotFound;
        }

        let outcome = match self.fetch(address).await {
            Ok(body) => parse_geocode_body(&body),
            Err(e) => GeocodeOutcome::Failed(e.to_string()),
        };

        match &outcome {
            GeocodeOutcome::Found(c) => debug!(
                address,
                latitude = c.latitude,
                longitude = c.longitude,
                "Geocode resolved"
            ),
            GeocodeOutcome::NotFound => debug!(address, "Geocode returned no placemarks"),
            GeocodeOutcome::Failed(reason) => {
                warn!(address, reason = %reason, "Geocode request failed");
            }
        }
        outcome
    }

    async fn fetch(&self, address: &str) -> Result<Vec<u8>, GeomarkError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", address);

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GeomarkError::UpstreamStatus(status));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Decodes a geocoder body into an outcome.
pub fn parse_geocode_body(body: &[u8]) -> GeocodeOutcome {
    match serde_json::from_slice::<GeocodeResponse>(body) {
        Ok(resp) => match resp.first_lat_lon() {
            Some((latitude, longitude)) => GeocodeOutcome::Found(Coordinates {
                latitude,
                longitude,
            }),
            None => GeocodeOutcome::NotFound,
        },
        Err(e) => GeocodeOutcome::Failed(format!("invalid geocoder payload: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_placemark_wins() {
        let body = br#"{"Placemark":[
            {"Point":{"coordinates":[-77.036,38.897,0]}},
            {"Point":{"coordinates":[-0.1276,51.5072,0]}}
        ]}"#;
        assert_eq!(
            parse_geocode_body(body),
            GeocodeOutcome::Found(Coordinates {
                latitude: 38.897,
                longitude: -77.036
            })
        );
    }

    #[test]
    fn zero_placemarks_is_not_found() {
        assert_eq!(
            parse_geocode_body(br#"{"Status":{"code":602},"Placemark":[]}"#),
            GeocodeOutcome::NotFound
        );
    }

    #[test]
    fn garbage_body_is_failure() {
        assert!(matches!(
            parse_geocode_body(b"<html>503</html>"),
            GeocodeOutcome::Failed(_)
        ));
    }

    #[test]
    fn response_carries_strings_and_seq() {
        let found = GeocodeOutcome::Found(Coordinates {
            latitude: 38.897,
            longitude: -77.036,
        })
        .into_response(Some(3));
        assert_eq!(found.latitude, "38.897");
        assert_eq!(found.longitude, "-77.036");
        assert!(found.found);
        assert_eq!(found.seq, Some(3));

        let empty = GeocodeOutcome::Failed("timeout".into()).into_response(None);
        assert_eq!(empty.latitude, "");
        assert_eq!(empty.longitude, "");
        assert!(!empty.found);
    }

    #[tokio::test]
    async fn blank_address_skips_network() {
        let gateway = GeocodeGateway::new(&MapConfig::default()).unwrap();
        assert_eq!(gateway.resolve("   ").await, GeocodeOutcome::NotFound);
    }
}
