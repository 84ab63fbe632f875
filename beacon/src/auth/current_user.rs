//! Extractor for the authenticated subject on protected routes.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::{AppState, auth::token, errors::Error};

/// The verified subject of the bearer token on the current request.
///
/// Adding this extractor to a handler makes the route protected: the request
/// is rejected before the handler body runs when no token is presented (401)
/// or when the presented token fails verification (403).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub subject: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(Error::TokenMissing)?;

        let value = auth_header.to_str().map_err(|_| Error::TokenInvalid)?;

        // A non-Bearer Authorization header means no token was presented
        let token = value.strip_prefix("Bearer ").ok_or(Error::TokenMissing)?;

        let claims = token::verify_token(token, &state.config)?;

        Ok(CurrentUser { subject: claims.sub })
    }
}
