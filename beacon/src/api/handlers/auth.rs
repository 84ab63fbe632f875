use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::auth::{LoginRequest, LoginResponse},
    auth::token,
    errors::Error,
};

/// Exchange the accepted login pair for a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    let subject = state.verifier.verify(&request.username, &request.password)?;
    let token = token::issue_token(&subject, &state.config)?;

    Ok(Json(LoginResponse { token }))
}
