use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo,
    repo_types::{NewUser, User, UserChanges},
};
use crate::{auth::password::hash_password_blocking, error::AppError};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_field("name", "blank", "name must not be blank"));
    }
    Ok(name.to_string())
}

/// Fails with 409 when `email` belongs to a user other than `except`.
async fn ensure_email_free(
    db: &SqlitePool,
    email: &str,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    match repo::find_by_email(db, email).await? {
        Some(existing) if Some(existing.id) != except => {
            warn!(email = %email, "email already registered");
            Err(AppError::Conflict("email already registered".into()))
        }
        _ => Ok(()),
    }
}

pub async fn create_user(db: &SqlitePool, req: CreateUserRequest) -> Result<User, AppError> {
    let name = normalize_name(&req.name)?;
    let email = normalize_email(&req.email);

    // The pre-check gives a clean 409; the UNIQUE constraint still covers a
    // concurrent insert that slips in between.
    ensure_email_free(db, &email, None).await?;

    let password_hash = hash_password_blocking(req.password).await?;
    let user = repo::create(
        db,
        NewUser {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok(user)
}

pub async fn get_user(db: &SqlitePool, id: Uuid) -> Result<User, AppError> {
    repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))
}

pub async fn list_users(db: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
    Ok(repo::list(db, limit, offset).await?)
}

pub async fn update_user(
    db: &SqlitePool,
    id: Uuid,
    req: UpdateUserRequest,
) -> Result<User, AppError> {
    if req.is_empty() {
        return Err(AppError::invalid_field(
            "body",
            "empty",
            "at least one of name, email, password is required",
        ));
    }

    let name = req.name.as_deref().map(normalize_name).transpose()?;

    // 404 takes precedence over any conflict on the new email
    get_user(db, id).await?;

    let email = req.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        ensure_email_free(db, email, Some(id)).await?;
    }
    let password_hash = match req.password {
        Some(p) => Some(hash_password_blocking(p).await?),
        None => None,
    };

    let changes = UserChanges {
        name,
        email,
        password_hash,
    };
    let user = repo::update(db, id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    info!(user_id = %user.id, "user updated");
    Ok(user)
}

pub async fn delete_user(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
    if !repo::delete(db, id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}
