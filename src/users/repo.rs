use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Find a user by (normalized) email.
pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Insert a new user. A duplicate email surfaces as a unique violation.
pub async fn create(db: &SqlitePool, new: NewUser) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.name)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

/// Newest first. Insertion order stands in for `created_at`, whose stored
/// text form does not sort chronologically within a second.
pub async fn list(db: &SqlitePool, limit: i64, offset: i64) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        ORDER BY rowid DESC
        LIMIT ? OFFSET ?
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

/// Apply `changes` and return the updated row, or `None` if `id` is unknown.
pub async fn update(db: &SqlitePool, id: Uuid, changes: UserChanges) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
           SET name = COALESCE(?, name),
               email = COALESCE(?, email),
               password_hash = COALESCE(?, password_hash)
         WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(changes.name)
    .bind(changes.email)
    .bind(changes.password_hash)
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Returns whether a row was removed.
pub async fn delete(db: &SqlitePool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
