use crate::db;
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::session::{AdminSession, UserSession};
use crate::web::MessageResponse;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: Option<i64>,
    pub credits: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct GetCreditsRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub credits: i32,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/addCredits", post(add_credits))
        .route("/api/user/getCredits", post(get_credits))
        .route("/api/user/deductCredits", post(deduct_credits))
        .route("/api/user/resetCredits", post(reset_credits))
        .with_state(state)
}

fn positive_amount(value: Option<i32>) -> Result<i32, ApiError> {
    match value {
        Some(amount) if amount > 0 => Ok(amount),
        Some(_) => Err(ApiError::validation("credits must be a positive amount")),
        None => Err(ApiError::validation("credits is required")),
    }
}

async fn add_credits(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<GrantRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;
    let amount = positive_amount(payload.credits)?;

    db::credits::add_or_increment(&state.pool, user_id, amount).await?;

    tracing::info!("granted {amount} credits to user {user_id}");
    Ok(Json(MessageResponse {
        message: "Credits added successfully",
    }))
}

/// The user id comes from the session when one is present, otherwise from
/// the body.
async fn get_credits(
    session: Option<UserSession>,
    State(state): State<SharedState>,
    payload: Option<Json<GetCreditsRequest>>,
) -> Result<Json<CreditsResponse>, ApiError> {
    let user_id = session
        .map(|UserSession(id)| id)
        .or_else(|| payload.and_then(|Json(p)| p.user_id))
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    let credits = db::credits::get(&state.pool, user_id).await?;
    Ok(Json(CreditsResponse { credits }))
}

async fn deduct_credits(
    State(state): State<SharedState>,
    Json(payload): Json<GrantRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;
    let amount = positive_amount(payload.credits)?;

    db::credits::deduct(&state.pool, user_id, amount).await?;

    tracing::info!("deducted {amount} credits from user {user_id}");
    Ok(Json(MessageResponse {
        message: "Credits deducted successfully",
    }))
}

async fn reset_credits(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    db::credits::reset(&state.pool, user_id).await?;

    tracing::info!("reset credits for user {user_id}");
    Ok(Json(MessageResponse {
        message: "Credits reset successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_pass() {
        assert_eq!(positive_amount(Some(10)).unwrap(), 10);
    }

    #[test]
    fn zero_negative_and_missing_amounts_fail() {
        assert!(positive_amount(Some(0)).is_err());
        assert!(positive_amount(Some(-5)).is_err());
        assert!(positive_amount(None).is_err());
    }
}
