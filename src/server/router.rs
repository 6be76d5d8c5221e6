use crate::config::{Config, MapConfig};
use crate::controller::{LocationController, NonceRegistry};
use crate::error::GeomarkError;
use crate::geocode::GeocodeGateway;
use crate::hooks::{
    AllowAuthenticated, ConfiguredContentTypes, ContentTypeProvider, FixedSize, NoOverride,
    PermissionPolicy, SizeOverridePolicy,
};
use crate::server::guards::auth::RequireAdminAuth;
use crate::server::routes::{admin, ajax, public};
use crate::store::CoordinateStore;

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tracing::{error, info, warn};

/// Process-wide key for the encrypted admin session cookie.
static COOKIE_KEY: LazyLock<Key> = LazyLock::new(Key::generate);

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct GeomarkState {
    pub map_cfg: Arc<MapConfig>,
    pub store: Arc<dyn CoordinateStore>,
    pub controller: LocationController,
    pub gateway: GeocodeGateway,
    pub content_types: Arc<dyn ContentTypeProvider>,
    pub sizes: Arc<dyn SizeOverridePolicy>,
    pub admin_key: Arc<str>,
    pub insecure_cookie: bool,
}

impl GeomarkState {
    /// Wires the default collaborators from configuration.
    pub fn new(cfg: &Config, store: Arc<dyn CoordinateStore>) -> Result<Self, GeomarkError> {
        let sizes: Arc<dyn SizeOverridePolicy> = match cfg.map.size_override.clone() {
            Some(size) => Arc::new(FixedSize(size)),
            None => Arc::new(NoOverride),
        };
        let permissions: Arc<dyn PermissionPolicy> = Arc::new(AllowAuthenticated);

        Self::with_collaborators(
            cfg,
            store,
            Arc::new(ConfiguredContentTypes::from_config(&cfg.map)),
            sizes,
            permissions,
        )
    }

    pub fn with_collaborators(
        cfg: &Config,
        store: Arc<dyn CoordinateStore>,
        content_types: Arc<dyn ContentTypeProvider>,
        sizes: Arc<dyn SizeOverridePolicy>,
        permissions: Arc<dyn PermissionPolicy>,
    ) -> Result<Self, GeomarkError> {
        let gateway = GeocodeGateway::new(&cfg.map)?;
        let controller =
            LocationController::new(store.clone(), NonceRegistry::default(), permissions);

        info!(
            geocode_url = %gateway.endpoint(),
            content_types = ?content_types.content_types(),
            size_override = ?cfg.map.size_override,
            "Map config (effective)"
        );

        Ok(Self {
            map_cfg: Arc::new(cfg.map.clone()),
            store,
            controller,
            gateway,
            content_types,
            sizes,
            admin_key: Arc::from(cfg.basic.admin_key.as_str()),
            insecure_cookie: cfg.basic.insecure_cookie,
        })
    }
}

impl FromRef<GeomarkState> for Key {
    fn from_ref(state: &GeomarkState) -> Self {
        let _ = state; // state not used to fetch the static key
        COOKIE_KEY.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn geomark_router(state: GeomarkState) -> Router {
    let guarded = Router::new()
        .merge(ajax::router())
        .merge(admin::router())
        .layer(middleware::from_extractor_with_state::<RequireAdminAuth, _>(
            state.clone(),
        ));

    Router::new()
        .merge(guarded)
        .merge(public::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
