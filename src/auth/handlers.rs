use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RefreshRequest},
    extractors::AuthUser,
    services::{authenticate, issue_tokens, token_subject},
};
use crate::{
    error::AppError, state::AppState, users::dto::UserResponse, validation::ValidatedJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = authenticate(&state.db, &payload.email, &payload.password).await?;
    Ok(Json(issue_tokens(&state.jwt, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = state.jwt.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("invalid or expired refresh token".into())
    })?;
    let user = token_subject(&state.db, claims.sub).await?;
    Ok(Json(issue_tokens(&state.jwt, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = token_subject(&state.db, user_id).await?;
    Ok(Json(user.into()))
}
