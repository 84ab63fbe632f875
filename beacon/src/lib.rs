//! # beacon: Civic Safety Portal API
//!
//! `beacon` is the public-facing HTTP API behind a civic safety portal. It
//! publishes alerts, accepts citizen incident reports with media, serves a
//! directory of relief/resource centers, relays a government news feed, and
//! records check-in messages that can trigger an outbound SMS.
//!
//! ## Overview
//!
//! The interesting part of the system is the request-handling pipeline rather
//! than any individual route: every request flows through CORS, rate
//! limiting, response caching (read routes), and bearer-token authentication
//! (write routes) before a handler runs. Most handlers are single-collection
//! create/read against PostgreSQL; the two exceptions are the resource
//! directory, which verifies a user-supplied city against an external
//! geocoder before trusting it as a filter, and check-in submission, which
//! persists first and then optionally dispatches an SMS.
//!
//! ### Request Flow
//!
//! CORS → rate limiter → response cache (GET routes) → token verification
//! (protected routes) → handler → store / external call → JSON response.
//!
//! The rate limiter short-circuits before any handler side effect. A cache
//! hit replays the stored response without executing the handler, which is
//! why only GET handlers can be registered behind it (see [`cache::cached`]).
//! All failures surface synchronously as `{"error": ...}` responses; nothing
//! is retried.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) holds the route handlers and their
//! request/response models. The **authentication layer** ([`auth`]) issues
//! and verifies stateless bearer tokens; the login check sits behind a
//! pluggable [`auth::verifier::CredentialVerifier`]. The **pipeline state**
//! ([`limits`], [`cache`]) is the only mutable state shared across requests.
//! External collaborators - the geocoder ([`geocode`]), the news feed
//! ([`news`]), and the SMS gateway ([`sms`]) - are each a thin client with an
//! explicit timeout. The **database layer** ([`db`]) uses the repository
//! pattern over SQLx/PostgreSQL.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use beacon::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = beacon::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     beacon::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! When embedding in an external host instead of binding a socket, build the
//! state and mount the router directly:
//!
//! ```ignore
//! let state = AppState::from_config(pool, config)?;
//! let router = beacon::build_router(state)?;
//! // hand `router` to the host runtime
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
pub mod geocode;
pub mod limits;
pub mod news;
mod openapi;
pub mod resolver;
pub mod sms;
pub mod telemetry;
pub mod uploads;

#[cfg(test)]
mod test;

/// Install the rustls crypto provider for tests.
///
/// Production installs it once in `main`; the test binaries never run `main`,
/// so each test that builds a TLS-capable `reqwest` client must ensure the
/// process-global provider is present. Idempotent and safe to call from every
/// test.
#[cfg(test)]
pub(crate) fn install_test_crypto_provider() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::post,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::verifier::{CredentialVerifier, FixedCredentialVerifier};
use crate::cache::{ResponseCache, cached};
use crate::geocode::GeocodeClient;
use crate::limits::RateLimiter;
use crate::news::NewsClient;
use crate::openapi::ApiDoc;
use crate::sms::SmsClient;

pub use config::Config;

/// Application state shared across all request handlers.
///
/// Contains the database pool, configuration, the shared pipeline state
/// (rate limiter and response cache), and the external-collaborator clients.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub limiter: Arc<RateLimiter>,
    pub cache: ResponseCache,
    pub geocode: GeocodeClient,
    pub news: NewsClient,
    pub sms: Option<SmsClient>,
}

impl AppState {
    /// Assemble state from configuration, wiring the default credential
    /// verifier and one shared HTTP client for every external collaborator.
    pub fn from_config(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;

        let verifier: Arc<dyn CredentialVerifier> = Arc::new(FixedCredentialVerifier::new(&config.auth.login));
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let cache = ResponseCache::new(&config.cache);
        let geocode = GeocodeClient::new(http.clone(), &config.geocoding);
        let news = NewsClient::new(http.clone(), &config.news);
        let sms = config.sms.as_ref().map(|sms_config| SmsClient::new(http, sms_config));

        Ok(Self {
            db,
            config,
            verifier,
            limiter,
            cache,
            geocode,
            news,
            sms,
        })
    }
}

/// Get the beacon database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let wildcard = config.cors.allowed_origins.iter().any(|origin| origin == "*");

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if wildcard {
        cors = cors.allow_origin(Any);
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        cors = cors.allow_origin(origins);

        // Credentials cannot be combined with a wildcard origin
        if config.cors.allow_credentials {
            cors = cors.allow_credentials(true);
        }
    }

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Cached read routes (alerts, resources, news)
/// - Bearer-protected write routes (alerts, reports, checkins)
/// - Public login and upload routes
/// - The shared fixed-window rate limiter in front of every API route
/// - CORS configuration and tracing middleware
/// - OpenAPI documentation at `/docs`
///
/// It is a public library export so an external host can mount the handler
/// without binding a socket.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Multipart bodies get headroom over the file ceiling; the upload policy
    // enforces the real limit with a typed error
    let body_limit = (state.config.uploads.max_bytes as usize).saturating_mul(2);

    // Read routes: replayed from the cache within the TTL. cached() only
    // accepts GET handlers, so nothing side-effecting can land here.
    let read_routes = Router::new()
        .route("/api/alerts", cached(state.clone(), api::handlers::alerts::list_alerts))
        .route(
            "/api/resources",
            cached(state.clone(), api::handlers::resources::list_resources),
        )
        .route("/api/news", cached(state.clone(), api::handlers::news::list_news))
        .with_state(state.clone());

    // Write routes: never cached. Protected ones authenticate via the
    // CurrentUser extractor; login and upload are public.
    let write_routes = Router::new()
        .route("/api/login", post(api::handlers::auth::login))
        .route("/api/alerts", post(api::handlers::alerts::create_alert))
        .route(
            "/api/reports",
            post(api::handlers::reports::create_report).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/checkins", post(api::handlers::checkins::create_checkin))
        .route(
            "/upload",
            post(api::handlers::uploads::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state.clone());

    // The rate limiter fronts every API route and short-circuits before any
    // handler side effect
    let api_routes = read_routes
        .merge(write_routes)
        .layer(from_fn_with_state(state.clone(), limits::rate_limit_middleware));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", axum::routing::get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// The composed application: router, state, and background upkeep.
pub struct Application {
    state: AppState,
    router: Router,
}

impl Application {
    /// Connect to the store, run migrations, and build the router.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        migrator().run(&pool).await?;

        let state = AppState::from_config(pool, config)?;
        let router = build_router(state.clone())?;

        Ok(Self { state, router })
    }

    /// Serve until `shutdown` resolves, then stop gracefully.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        // Background upkeep: periodically drop expired rate windows
        let sweep_token = tokio_util::sync::CancellationToken::new();
        let sweeper = limits::spawn_window_sweeper(self.state.limiter.clone(), sweep_token.clone());

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        sweep_token.cancel();
        let _ = sweeper.await;

        Ok(())
    }
}
