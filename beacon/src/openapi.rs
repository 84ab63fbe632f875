//! OpenAPI documentation aggregation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::models::{
    alerts::{AlertCreate, AlertResponse},
    auth::{LoginRequest, LoginResponse},
    checkins::{CheckinCreate, CheckinResponse},
    news::NewsItem,
    reports::ReportResponse,
    resources::ResourceResponse,
    uploads::UploadResponse,
};
use crate::sms::NotificationStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth::login,
        crate::api::handlers::alerts::list_alerts,
        crate::api::handlers::alerts::create_alert,
        crate::api::handlers::reports::create_report,
        crate::api::handlers::resources::list_resources,
        crate::api::handlers::news::list_news,
        crate::api::handlers::checkins::create_checkin,
        crate::api::handlers::uploads::upload_file,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        AlertCreate,
        AlertResponse,
        ReportResponse,
        ResourceResponse,
        NewsItem,
        CheckinCreate,
        CheckinResponse,
        NotificationStatus,
        UploadResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "authentication", description = "Token issuance"),
        (name = "alerts", description = "Public safety alerts"),
        (name = "reports", description = "Citizen incident reports"),
        (name = "resources", description = "Relief/resource center directory"),
        (name = "news", description = "Relayed government news feed"),
        (name = "checkins", description = "Citizen check-ins"),
        (name = "uploads", description = "File intake"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
