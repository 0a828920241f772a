use sqlx::PgPool;
use thiserror::Error;

/// A failed deduction must be tellable apart from a broken connection, so
/// callers can answer with a specific message instead of a 500.
#[derive(Debug, Error)]
pub enum DeductError {
    #[error("Insufficient credits")]
    Insufficient,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Grant as a single native upsert. Concurrent grants serialize on the row
/// inside the engine; the application never reads a balance back to add to it.
pub async fn add_or_increment(pool: &PgPool, user_id: i64, amount: i32) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO credits (user_id, credits)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE
        SET credits = credits.credits + EXCLUDED.credits
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .execute(pool)
    .await?;
    Ok(())
}

/// A user with no grant history has a balance of zero, not an error.
pub async fn get(pool: &PgPool, user_id: i64) -> sqlx::Result<i32> {
    let balance: Option<i32> =
        sqlx::query_scalar("SELECT credits FROM credits WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(balance.unwrap_or(0))
}

/// Conditional decrement. The `credits >= amount` guard rides inside the
/// UPDATE, so the balance can never go negative no matter how many
/// deductions race; zero affected rows means the guard failed.
pub async fn deduct(pool: &PgPool, user_id: i64, amount: i32) -> Result<(), DeductError> {
    let result = sqlx::query(
        r#"
        UPDATE credits
        SET credits = credits - $2
        WHERE user_id = $1
          AND credits >= $2
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DeductError::Insufficient);
    }
    Ok(())
}

pub async fn reset(pool: &PgPool, user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE credits SET credits = 0 WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
