use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Full row, including the password hash. Only the auth path should see this.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub registered_on: DateTime<Utc>,
    pub company_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub calls_made: i32,
}

/// Projection served to clients; never carries the password hash.
#[derive(Debug, Serialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub registered_on: DateTime<Utc>,
    pub company_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub calls_made: i32,
}

pub async fn add(
    pool: &PgPool,
    user_name: &str,
    email: &str,
    password_hash: &str,
    company_name: Option<&str>,
    whatsapp_number: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (user_name, email, password, company_name, whatsapp_number)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_name)
    .bind(email)
    .bind(password_hash)
    .bind(company_name)
    .bind(whatsapp_number)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> sqlx::Result<Vec<UserProfile>> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, user_name, email, registered_on, company_name, whatsapp_number, calls_made
        FROM users
        ORDER BY registered_on ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_by_id(pool: &PgPool, user_id: i64) -> sqlx::Result<Option<UserProfile>> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, user_name, email, registered_on, company_name, whatsapp_number, calls_made
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, user_name, email, password, registered_on, company_name, whatsapp_number, calls_made
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, user_id: i64) -> sqlx::Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Full overwrite of the mutable profile fields.
pub async fn update_info(
    pool: &PgPool,
    user_id: i64,
    user_name: &str,
    email: &str,
    company_name: Option<&str>,
    whatsapp_number: Option<&str>,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET user_name = $2, email = $3, company_name = $4, whatsapp_number = $5
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(user_name)
    .bind(email)
    .bind(company_name)
    .bind(whatsapp_number)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Single statement; call data, calls, and credits go with the row through
/// the declared ON DELETE CASCADE constraints.
pub async fn delete(pool: &PgPool, user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Atomic counter bump; never read-then-write.
pub async fn increment_calls_made(pool: &PgPool, user_id: i64, by: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE users SET calls_made = calls_made + $2 WHERE id = $1")
        .bind(user_id)
        .bind(by)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
