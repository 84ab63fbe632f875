use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Protected route called without a bearer token
    #[error("Token required")]
    TokenMissing,

    /// Bearer token present but malformed, expired, or carrying a bad signature
    #[error("Invalid token")]
    TokenInvalid,

    /// Login rejected
    #[error("{message}")]
    Unauthenticated { message: String },

    /// Fixed-window ceiling exceeded for this client
    #[error("Too many requests")]
    RateLimited,

    /// City filter rejected by the external geocoder
    #[error("Unknown location: {city}")]
    UnknownCity { city: String },

    /// Requested resource not found
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Uploaded file's declared MIME type is not accepted
    #[error("Unsupported file type: {mime}")]
    UnsupportedMedia { mime: String },

    /// Uploaded file exceeds the size ceiling
    #[error("File exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    /// External collaborator unreachable or misbehaving
    #[error("{service} unavailable: {reason}")]
    Upstream { service: &'static str, reason: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::TokenMissing => StatusCode::UNAUTHORIZED,
            Error::TokenInvalid => StatusCode::FORBIDDEN,
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Error::UnknownCity { .. } => StatusCode::NOT_FOUND,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::UnsupportedMedia { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::Unavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::TokenMissing => "Token required".to_string(),
            Error::TokenInvalid => "Invalid token".to_string(),
            Error::Unauthenticated { message } => message.clone(),
            Error::RateLimited => "Too many requests".to_string(),
            Error::UnknownCity { city } => format!("Unknown location: {city}"),
            Error::NotFound { resource } => format!("{resource} not found"),
            Error::BadRequest { message } => message.clone(),
            Error::UnsupportedMedia { mime } => format!("Unsupported file type: {mime}"),
            Error::PayloadTooLarge { limit } => {
                format!("File exceeds maximum size of {limit} bytes")
            }
            Error::Database(DbError::NotFound) => "Resource not found".to_string(),
            Error::Upstream { .. }
            | Error::Internal { .. }
            | Error::Database(_)
            | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Upstream { .. } | Error::Internal { .. } | Error::Database(_) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::TokenMissing | Error::TokenInvalid | Error::Unauthenticated { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::RateLimited => {
                tracing::debug!("Rate limited: {}", self);
            }
            Error::UnknownCity { .. }
            | Error::NotFound { .. }
            | Error::BadRequest { .. }
            | Error::UnsupportedMedia { .. }
            | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = serde_json::json!({ "error": self.user_message() });

        (status, Json(body)).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::TokenMissing.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::TokenInvalid.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            Error::UnknownCity { city: "Atlantis".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::UnsupportedMedia { mime: "text/plain".into() }.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            Error::PayloadTooLarge { limit: 5 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = Error::Upstream {
            service: "geocoder",
            reason: "connection refused to 10.1.2.3:443".to_string(),
        };
        assert_eq!(err.user_message(), "Internal server error");

        let err = Error::Database(DbError::Unavailable {
            message: "pool timed out".to_string(),
        });
        assert_eq!(err.user_message(), "Internal server error");
    }
}
