use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Full row, including the password hash. Only the auth path should see this.
#[derive(Debug, FromRow)]
pub struct Admin {
    pub id: i64,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
    pub whatsapp_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing projection without the password hash.
#[derive(Debug, Serialize, FromRow)]
pub struct AdminSummary {
    pub id: i64,
    pub admin_name: String,
    pub admin_email: String,
    pub whatsapp_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn add(
    pool: &PgPool,
    admin_name: &str,
    admin_email: &str,
    password_hash: &str,
    whatsapp_number: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO admins (admin_name, admin_email, admin_password, whatsapp_number)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(admin_name)
    .bind(admin_email)
    .bind(password_hash)
    .bind(whatsapp_number)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> sqlx::Result<Vec<AdminSummary>> {
    sqlx::query_as::<_, AdminSummary>(
        r#"
        SELECT id, admin_name, admin_email, whatsapp_number, created_at
        FROM admins
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_by_id(pool: &PgPool, admin_id: i64) -> sqlx::Result<Option<Admin>> {
    sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, admin_name, admin_email, admin_password, whatsapp_number, created_at
        FROM admins
        WHERE id = $1
        "#,
    )
    .bind(admin_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_email(pool: &PgPool, admin_email: &str) -> sqlx::Result<Option<Admin>> {
    sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, admin_name, admin_email, admin_password, whatsapp_number, created_at
        FROM admins
        WHERE admin_email = $1
        "#,
    )
    .bind(admin_email)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, admin_id: i64) -> sqlx::Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM admins WHERE id = $1")
        .bind(admin_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Deleting an absent id affects zero rows and is not an error.
pub async fn delete(pool: &PgPool, admin_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
