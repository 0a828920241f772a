use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct CallData {
    pub id: i64,
    pub user_id: i64,
    pub twilio_phone_number: Option<String>,
    pub dataset: String,
    pub greeting_message: String,
}

/// Inserted once, at user-creation time. UNIQUE(user_id) keeps it one row
/// per user from then on.
pub async fn add(
    pool: &PgPool,
    user_id: i64,
    twilio_phone_number: Option<&str>,
    dataset: &str,
    greeting_message: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO user_call_data (user_id, twilio_phone_number, dataset, greeting_message)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(twilio_phone_number)
    .bind(dataset)
    .bind(greeting_message)
    .fetch_one(pool)
    .await
}

pub async fn get_all_for_user(pool: &PgPool, user_id: i64) -> sqlx::Result<Vec<CallData>> {
    sqlx::query_as::<_, CallData>(
        r#"
        SELECT id, user_id, twilio_phone_number, dataset, greeting_message
        FROM user_call_data
        WHERE user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_dataset(pool: &PgPool, user_id: i64, dataset: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE user_call_data SET dataset = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(dataset)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_dataset(pool: &PgPool, user_id: i64) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>("SELECT dataset FROM user_call_data WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_greeting(pool: &PgPool, user_id: i64, greeting: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE user_call_data SET greeting_message = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(greeting)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_greeting(pool: &PgPool, user_id: i64) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT greeting_message FROM user_call_data WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
