use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::Query,
    http::{Request, StatusCode, header},
    routing::get,
};
use geomark::config::Config;
use geomark::server::router::{GeomarkState, geomark_router};
use geomark_schema::AddressSearchResponse;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tower::ServiceExt;

const ADMIN_KEY: &str = "pwd";

/// Local stand-in for the geocoder: "White House" resolves, "boom" is a 500,
/// everything else has no placemarks.
async fn spawn_fake_geocoder() -> String {
    async fn geo(Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        match q.get("q").map(String::as_str) {
            Some("White House") => (
                StatusCode::OK,
                Json(json!({
                    "Status": {"code": 200},
                    "Placemark": [
                        {"Point": {"coordinates": [-77.036_5, 38.897_7, 0]}},
                        {"Point": {"coordinates": [0.0, 0.0, 0]}}
                    ]
                })),
            ),
            Some("boom") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
            _ => (
                StatusCode::OK,
                Json(json!({"Status": {"code": 602}, "Placemark": []})),
            ),
        }
    }

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake geocoder");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let app = Router::new().route("/maps/geo", get(geo));
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/maps/geo")
}

async fn build_app(geocode_url: &str) -> Router {
    build_app_with(geocode_url, true).await
}

async fn build_app_with(geocode_url: &str, insecure_cookie: bool) -> Router {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "geomark-route-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let db = geomark::db::spawn(&format!("sqlite:{}", temp_path.display()))
        .await
        .expect("db actor spawn");

    let mut cfg = Config::default();
    cfg.basic.admin_key = ADMIN_KEY.to_string();
    cfg.basic.insecure_cookie = insecure_cookie;
    cfg.map.geocode_url = geocode_url.parse().expect("geocode url");

    let state = GeomarkState::new(&cfg, Arc::new(db)).expect("state");
    geomark_router(state)
}

async fn body_string(resp: axum::response::Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

fn extract_nonce(page: &str) -> String {
    let marker = r#"name="wdsgmap_nonce" value=""#;
    let start = page.find(marker).expect("nonce field present") + marker.len();
    let end = start + page[start..].find('"').expect("nonce value terminated");
    page[start..end].to_string()
}

fn ajax(address: &str, seq: u64) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "wds_gmap_address_search")
        .append_pair("address", address)
        .append_pair("seq", &seq.to_string())
        .finish();
    Request::builder()
        .method("POST")
        .uri("/wp-admin/admin-ajax.php")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-api-key", ADMIN_KEY)
        .body(Body::from(body))
        .expect("failed to build request")
}

#[tokio::test]
async fn admin_routes_require_key() {
    let app = build_app("http://127.0.0.1:9/maps/geo").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/post/1/location")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/wp-admin/admin-ajax.php")
                .header("x-api-key", "wrong")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("action=wds_gmap_address_search&address=x"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Public surfaces stay open.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/assets/wdsgmap-admin.js")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("wds_gmap_address_search"));
}

#[tokio::test]
async fn editor_save_and_shortcode_render() {
    let app = build_app("http://127.0.0.1:9/maps/geo").await;

    // 1) Shortcode before any location is stored -> empty output.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/items/11/render")
                .body(Body::from(r#"[wds-gmap height="300px"]"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "");

    // 2) Editor page: default view, nonce issued, session cookie set.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/post/11/location")
                .header("x-api-key", ADMIN_KEY)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();
    let page = body_string(resp).await;
    assert!(page.contains(r#"data-zoom="4""#));
    assert!(page.contains("height:400px"));
    let nonce = extract_nonce(&page);

    // 3) Browser-style save authenticated by the session cookie alone.
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("wdsgmap_nonce", &nonce)
        .append_pair("wdsgmap_address", "1600 Pennsylvania Ave")
        .append_pair("wdsgmap_latitude", "38.897")
        .append_pair("wdsgmap_longitude", "-77.036")
        .finish();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/post/11/location")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(form))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/admin/post/11/location"
    );

    // 4) Editor now opens on the stored marker.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/post/11/location")
                .header("x-api-key", ADMIN_KEY)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let page = body_string(resp).await;
    assert!(page.contains(r#"data-zoom="16""#));
    assert!(page.contains(r#"value="1600 Pennsylvania Ave""#));

    // 5) Shortcode with a height attribute.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/items/11/render")
                .body(Body::from(r#"<p>Visit us</p>[wds-gmap height="300px"]"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let html = body_string(resp).await;
    assert!(html.starts_with("<p>Visit us</p><div id=\"map_canvas\""));
    assert!(html.contains("height:300px"));
    assert!(html.contains("new google.maps.LatLng(38.897, -77.036)"));

    // 6) Blank save clears the location again.
    let form = format!(
        "wdsgmap_nonce={nonce}&wdsgmap_address=&wdsgmap_latitude=&wdsgmap_longitude="
    );
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/post/11/location")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("x-api-key", ADMIN_KEY)
                .body(Body::from(form))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/items/11/map?height=300px")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(body_string(resp).await, "");
}

fn session_cookie_header(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie")
        .to_string()
}

#[tokio::test]
async fn session_cookie_secure_flag_follows_config() {
    for (insecure, expect_secure) in [(false, true), (true, false)] {
        let app = build_app_with("http://127.0.0.1:9/maps/geo", insecure).await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/admin/post/1/location")
                    .header("x-api-key", ADMIN_KEY)
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = session_cookie_header(&resp);
        assert!(cookie.starts_with("geomark_admin="));
        assert!(cookie.contains("HttpOnly"));
        assert_eq!(cookie.contains("; Secure"), expect_secure, "{cookie}");
    }
}

#[tokio::test]
async fn content_type_without_metabox_is_not_found() {
    let app = build_app("http://127.0.0.1:9/maps/geo").await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/admin/attachment/3/location")
                .header("x-api-key", ADMIN_KEY)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn address_search_reports_found_missing_and_failed() {
    let geocode_url = spawn_fake_geocoder().await;
    let app = build_app(&geocode_url).await;

    // First placemark wins, swapped into (lat, lon); seq echoed.
    let resp = app
        .clone()
        .oneshot(ajax("White House", 4))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: AddressSearchResponse =
        serde_json::from_str(&body_string(resp).await).expect("json reply");
    assert_eq!(
        reply,
        AddressSearchResponse {
            latitude: "38.8977".to_string(),
            longitude: "-77.0365".to_string(),
            found: true,
            seq: Some(4),
        }
    );

    // Zero placemarks -> explicit empty result.
    let resp = app
        .clone()
        .oneshot(ajax("Atlantis", 5))
        .await
        .expect("request failed");
    let reply: AddressSearchResponse =
        serde_json::from_str(&body_string(resp).await).expect("json reply");
    assert_eq!(reply, AddressSearchResponse::empty(Some(5)));

    // Upstream failure -> same empty shape, no error status.
    let resp = app
        .clone()
        .oneshot(ajax("boom", 6))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: Value = serde_json::from_str(&body_string(resp).await).expect("json reply");
    assert_eq!(
        reply,
        json!({"latitude": "", "longitude": "", "found": false, "seq": 6})
    );

    // Unknown action.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/wp-admin/admin-ajax.php")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("x-api-key", ADMIN_KEY)
                .body(Body::from("action=something_else&address=x"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(resp).await, "0");
}
