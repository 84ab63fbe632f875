//! End-to-end pipeline behavior: token handling, rate limiting, response
//! caching, city verification, and upload rejection, all through the real
//! router composition.

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use chrono::Utc;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::models::auth::LoginResponse;
use crate::auth::token;
use crate::config::RateLimitConfig;
use crate::test::{test_config, test_server};

fn login_body() -> Value {
    json!({ "username": "admin", "password": "changeme" })
}

#[tokio::test]
async fn test_login_returns_verifiable_token() {
    let config = test_config();
    let server = test_server(config.clone());

    let response = server.post("/api/login").json(&login_body()).await;
    response.assert_status_ok();

    let body: LoginResponse = response.json();
    let claims = token::verify_token(&body.token, &config).expect("issued token should verify");
    assert_eq!(claims.sub, "admin");
}

#[tokio::test]
async fn test_login_rejects_any_other_pair() {
    let server = test_server(test_config());

    let response = server
        .post("/api/login")
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let server = test_server(test_config());

    let response = server
        .post("/api/alerts")
        .json(&json!({ "title": "Flood warning", "message": "Avoid the riverside" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"], "Token required");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_is_403() {
    let server = test_server(test_config());

    let response = server
        .post("/api/alerts")
        .authorization_bearer("not-a-real-token")
        .json(&json!({ "title": "Flood warning", "message": "Avoid the riverside" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_protected_route_with_expired_token_is_403() {
    let config = test_config();
    let server = test_server(config.clone());

    // Craft a token that expired beyond the validation leeway
    let now = Utc::now();
    let claims = token::Claims {
        sub: "admin".to_string(),
        iat: (now - chrono::Duration::hours(2)).timestamp(),
        exp: (now - chrono::Duration::hours(1)).timestamp(),
    };
    let key = jsonwebtoken::EncodingKey::from_secret(config.secret_key.as_ref().unwrap().as_bytes());
    let expired = jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &key).unwrap();

    let response = server
        .post("/api/alerts")
        .authorization_bearer(&expired)
        .json(&json!({ "title": "Flood warning", "message": "Avoid the riverside" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rate_limit_ceiling_then_window_rollover() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        window: Duration::from_secs(1),
        max_requests: 1,
    };
    let server = test_server(config);

    // Four rapid requests span at most two clock-aligned windows, so with a
    // ceiling of one at least two must be rejected
    let mut rejected = 0;
    for _ in 0..4 {
        let response = server.post("/api/login").json(&login_body()).await;
        match response.status_code() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => {
                let body: Value = response.json();
                assert_eq!(body["error"], "Too many requests");
                rejected += 1;
            }
            other => panic!("unexpected status {other}"),
        }
    }
    assert!(rejected >= 2, "ceiling should reject requests, got {rejected} rejections");

    // Crossing into a fresh window restores service
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let response = server.post("/api/login").json(&login_body()).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_rate_limit_counts_clients_separately() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        window: Duration::from_secs(3600),
        max_requests: 1,
    };
    let server = test_server(config);

    let first = server
        .post("/api/login")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&login_body())
        .await;
    first.assert_status_ok();

    let second = server
        .post("/api/login")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&login_body())
        .await;
    second.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // A different client still has budget
    let other = server
        .post("/api/login")
        .add_header("x-forwarded-for", "203.0.113.8")
        .json(&login_body())
        .await;
    other.assert_status_ok();
}

#[tokio::test]
async fn test_cached_read_replays_without_second_upstream_hit() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
             <title>Advisories</title><link>https://news.example.gov</link>\
             <description>Official</description>\
             <item><title>Bridge closure</title><link>https://news.example.gov/1</link>\
             <description>Until further notice</description></item>\
             </channel></rss>",
            "application/rss+xml",
        ))
        .expect(1)
        .mount(&feed)
        .await;

    let mut config = test_config();
    config.news.feed_url = Url::parse(&format!("{}/feed.xml", feed.uri())).unwrap();
    let server = test_server(config);

    let first = server.get("/api/news").await;
    first.assert_status_ok();

    // Replayed verbatim from the cache; the expect(1) above verifies the
    // handler did not run again
    let second = server.get("/api/news").await;
    second.assert_status_ok();
    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn test_unknown_city_is_404_and_store_is_never_queried() {
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&geocoder)
        .await;

    let mut config = test_config();
    config.geocoding.base_url = Url::parse(&geocoder.uri()).unwrap();
    let server = test_server(config);

    // The store behind this server is unreachable, so a 404 (not a 500)
    // proves the resolver stopped at the verification stage
    let response = server.get("/api/resources?city=Atlantis").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown location: Atlantis");
}

#[tokio::test]
async fn test_unfiltered_resources_never_call_geocoder() {
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "display_name": "x" }])))
        .expect(0)
        .mount(&geocoder)
        .await;

    let mut config = test_config();
    config.geocoding.base_url = Url::parse(&geocoder.uri()).unwrap();
    let server = test_server(config);

    // No city filter: the request goes straight to the (unreachable) store;
    // the geocoder expectation of zero calls is verified when the mock drops
    let response = server.get("/api/resources").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_upload_of_text_file_is_rejected_before_persistence() {
    let server = test_server(test_config());

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"just some notes".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );

    // 415 rather than a store failure: validation ran before any persistence
    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_oversize_image_upload_is_rejected() {
    let server = test_server(test_config());

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; 6 * 1024 * 1024])
            .file_name("photo.png")
            .mime_type("image/png"),
    );

    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_report_media_validation_runs_before_persistence() {
    let config = test_config();
    let server = test_server(config.clone());
    let bearer = token::issue_token("admin", &config).unwrap();

    let form = MultipartForm::new()
        .add_text("description", "Downed power line")
        .add_text("location", "5th and Main")
        .add_part(
            "media",
            Part::bytes(b"plain text".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );

    let response = server
        .post("/api/reports")
        .authorization_bearer(&bearer)
        .multipart(form)
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_checkin_validation_runs_before_persistence() {
    let config = test_config();
    let server = test_server(config.clone());
    let bearer = token::issue_token("admin", &config).unwrap();

    let response = server
        .post("/api/checkins")
        .authorization_bearer(&bearer)
        .json(&json!({ "message": "", "phone": "+639171234567" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint_is_not_rate_limited() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        window: Duration::from_secs(3600),
        max_requests: 1,
    };
    let server = test_server(config);

    server.post("/api/login").json(&login_body()).await.assert_status_ok();
    for _ in 0..5 {
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }
}
