use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, Pagination, UpdateUserRequest, UserResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState, validation::ValidatedJson};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), AppError> {
    let user = services::create_user(&state.db, payload).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/users/{}", user.id))
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(user.into())))
}

#[instrument(skip(state, query))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let Query(p) = query?;
    let (limit, offset) = p.clamped();
    let users = services::list_users(&state.db, limit, offset).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, id))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(id) = id?;
    let user = services::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, id, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(id) = id?;
    let user = services::update_user(&state.db, id, payload).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, id))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    services::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
