use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::AuthResponse,
    jwt::JwtKeys,
    password::verify_password_blocking,
};
use crate::{
    error::AppError,
    users::{repo, repo_types::User, services::normalize_email},
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Check an email/password pair. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn authenticate(db: &SqlitePool, email: &str, password: &str) -> Result<User, AppError> {
    let email = normalize_email(email);
    let Some(user) = repo::find_by_email(db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    let ok = verify_password_blocking(password.to_owned(), user.password_hash.clone()).await?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Look up the subject of a verified token; a deleted user is an auth failure.
pub async fn token_subject(db: &SqlitePool, user_id: Uuid) -> Result<User, AppError> {
    repo::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("user not found".into()))
}

pub fn issue_tokens(keys: &JwtKeys, user: User) -> Result<AuthResponse, AppError> {
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in: keys.access_ttl.as_secs(),
        user: user.into(),
    })
}
