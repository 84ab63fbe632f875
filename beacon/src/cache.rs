//! Short-TTL response cache for read-only routes.
//!
//! Cached entries are keyed by the normalized request identity (method, path,
//! and query parameters in sorted order). On a hit within the TTL the stored
//! response is replayed verbatim and the route handler never executes - which
//! is only sound for handlers without side effects. [`cached`] is the single
//! way the cache middleware is attached, and it only builds `GET` method
//! routers, so a write handler cannot end up behind the cache.
//!
//! Only successful (2xx) responses are stored. There is no invalidation on
//! writes; staleness up to one TTL is accepted.

use axum::{
    body::Body,
    extract::{Request, State},
    handler::Handler,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use bytes::Bytes;
use moka::future::Cache;

use crate::AppState;
use crate::config::CacheConfig;

/// A stored response: just enough to replay it byte-identically.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Concurrent TTL-bounded response store.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(config.ttl)
                .build(),
        }
    }

    /// Normalized request identity: method + path + sorted query parameters.
    pub fn key(method: &Method, uri: &Uri) -> String {
        let mut params: Vec<(String, String)> = uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        params.sort();

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        format!("{method} {}?{query}", uri.path())
    }

    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: String, response: CachedResponse) {
        self.entries.insert(key, response).await;
    }
}

/// Register a read-only handler behind the response cache.
///
/// Accepting only a handler for `get()` is what keeps side-effecting routes
/// out of the cache: there is no way to construct the caching middleware
/// around anything but a GET method router.
pub fn cached<H, T>(state: AppState, handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).layer(middleware::from_fn_with_state(state, replay_or_execute))
}

/// Serve from the cache when fresh; otherwise run the handler and store a
/// successful response.
async fn replay_or_execute(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = ResponseCache::key(request.method(), request.uri());

    if let Some(hit) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "Response cache hit");
        return hit.into_response();
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer response body for caching");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let entry = CachedResponse {
        status: parts.status,
        content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
        body: bytes.clone(),
    };
    state.cache.insert(key, entry).await;

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cache(ttl: Duration) -> ResponseCache {
        ResponseCache::new(&CacheConfig { ttl, max_entries: 16 })
    }

    fn entry(body: &str) -> CachedResponse {
        CachedResponse {
            status: StatusCode::OK,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    #[test]
    fn test_key_sorts_query_parameters() {
        let uri_a: Uri = "/api/resources?city=Cebu&page=2".parse().unwrap();
        let uri_b: Uri = "/api/resources?page=2&city=Cebu".parse().unwrap();
        assert_eq!(
            ResponseCache::key(&Method::GET, &uri_a),
            ResponseCache::key(&Method::GET, &uri_b)
        );
    }

    #[test]
    fn test_key_distinguishes_method_path_and_query() {
        let uri: Uri = "/api/resources?city=Cebu".parse().unwrap();
        let other: Uri = "/api/resources?city=Davao".parse().unwrap();
        let get_key = ResponseCache::key(&Method::GET, &uri);

        assert_ne!(get_key, ResponseCache::key(&Method::HEAD, &uri));
        assert_ne!(get_key, ResponseCache::key(&Method::GET, &other));

        let alerts: Uri = "/api/alerts".parse().unwrap();
        assert_ne!(get_key, ResponseCache::key(&Method::GET, &alerts));
    }

    #[tokio::test]
    async fn test_hit_within_ttl_replays_stored_entry() {
        let cache = cache(Duration::from_secs(60));
        cache.insert("GET /api/alerts?".to_string(), entry("[1,2,3]")).await;

        let hit = cache.get("GET /api/alerts?").await.expect("entry should be fresh");
        assert_eq!(hit.body.as_ref(), b"[1,2,3]");
        assert_eq!(hit.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(Duration::from_millis(50));
        cache.insert("GET /api/alerts?".to_string(), entry("[]")).await;
        assert!(cache.get("GET /api/alerts?").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("GET /api/alerts?").await.is_none());
    }
}
