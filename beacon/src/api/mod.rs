//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`POST /api/login`): exchange the accepted login pair for a bearer token
//! - **Alerts** (`/api/alerts`): public read of recent alerts, authenticated publish
//! - **Reports** (`POST /api/reports`): authenticated incident reports with optional media
//! - **Resources** (`GET /api/resources`): relief center directory with city verification
//! - **News** (`GET /api/news`): relayed government feed
//! - **Check-ins** (`POST /api/checkins`): authenticated check-ins with optional SMS dispatch
//! - **Uploads** (`POST /upload`): public metadata-only file intake
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`; the
//! rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
