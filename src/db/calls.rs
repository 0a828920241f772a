use crate::domain::models::{CallType, CallbackStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

#[derive(Debug, Serialize, FromRow)]
pub struct Call {
    pub id: i64,
    pub user_id: i64,
    pub receiver_name: Option<String>,
    pub receiver_phone: String,
    pub call_type: String,
    pub conversation_history: String,
    pub ai_transmission_message: String,
    pub callback_status: String,
    pub call_done: bool,
    pub call_timestamp: DateTime<Utc>,
}

/// A call record about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCall {
    pub user_id: i64,
    pub receiver_name: Option<String>,
    pub receiver_phone: String,
    pub call_type: CallType,
    pub conversation_history: String,
    pub ai_transmission_message: String,
    pub callback_status: CallbackStatus,
    pub call_done: bool,
}

pub async fn add(pool: &PgPool, call: &NewCall) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO calls (user_id, receiver_name, receiver_phone, call_type,
                           conversation_history, ai_transmission_message,
                           callback_status, call_done)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(call.user_id)
    .bind(&call.receiver_name)
    .bind(&call.receiver_phone)
    .bind(call.call_type.as_str())
    .bind(&call.conversation_history)
    .bind(&call.ai_transmission_message)
    .bind(call.callback_status.as_str())
    .bind(call.call_done)
    .fetch_one(pool)
    .await
}

/// One multi-row INSERT; either every row lands or none do.
pub async fn add_bulk(pool: &PgPool, calls: &[NewCall]) -> sqlx::Result<u64> {
    if calls.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO calls (user_id, receiver_name, receiver_phone, call_type, \
         conversation_history, ai_transmission_message, callback_status, call_done) ",
    );
    builder.push_values(calls, |mut row, call| {
        row.push_bind(call.user_id)
            .push_bind(&call.receiver_name)
            .push_bind(&call.receiver_phone)
            .push_bind(call.call_type.as_str())
            .push_bind(&call.conversation_history)
            .push_bind(&call.ai_transmission_message)
            .push_bind(call.callback_status.as_str())
            .push_bind(call.call_done);
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn get_all_for_user(pool: &PgPool, user_id: i64) -> sqlx::Result<Vec<Call>> {
    sqlx::query_as::<_, Call>(
        r#"
        SELECT id, user_id, receiver_name, receiver_phone, call_type,
               conversation_history, ai_transmission_message,
               callback_status, call_done, call_timestamp
        FROM calls
        WHERE user_id = $1
        ORDER BY call_timestamp DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    call_id: i64,
    callback_status: CallbackStatus,
    call_done: bool,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE calls
        SET callback_status = $2, call_done = $3
        WHERE id = $1
        "#,
    )
    .bind(call_id)
    .bind(callback_status.as_str())
    .bind(call_done)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// `filter_type` is either the literal "all" or one exact callback_status
/// value. Anything else matches zero rows rather than erroring.
pub async fn filter(pool: &PgPool, user_id: i64, filter_type: &str) -> sqlx::Result<Vec<Call>> {
    if filter_type == "all" {
        return get_all_for_user(pool, user_id).await;
    }

    sqlx::query_as::<_, Call>(
        r#"
        SELECT id, user_id, receiver_name, receiver_phone, call_type,
               conversation_history, ai_transmission_message,
               callback_status, call_done, call_timestamp
        FROM calls
        WHERE user_id = $1
          AND callback_status = $2
        ORDER BY call_timestamp DESC
        "#,
    )
    .bind(user_id)
    .bind(filter_type)
    .fetch_all(pool)
    .await
}
