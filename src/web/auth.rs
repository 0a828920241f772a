use crate::db;
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::session::{self, AdminSession, SessionScope, UserSession};
use crate::web::{required, MessageResponse};
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub message: &'static str,
    pub admin_id: i64,
}

#[derive(Debug, Serialize)]
pub struct UserLoginResponse {
    pub message: &'static str,
    pub user_id: i64,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/adminLogin", post(admin_login))
        .route("/api/adminLogout", post(admin_logout))
        .route("/api/userLogin", post(user_login))
        .route("/api/userLogout", post(user_logout))
        .with_state(state)
}

/// Same rejection for unknown email and wrong password; the response must
/// not tell an attacker which half was right.
fn verify_password(stored_hash: &str, password: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| ApiError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)
}

fn login_cookie(scope: SessionScope, token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&session::session_cookie(scope, token))
            .map_err(|_| ApiError::Internal("Session cookie was not a valid header value"))?,
    );
    Ok(headers)
}

fn logout_cookie(scope: SessionScope) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&session::clear_session_cookie(scope))
            .map_err(|_| ApiError::Internal("Session cookie was not a valid header value"))?,
    );
    Ok(headers)
}

async fn admin_login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.login_limiter.allow(&addr.ip().to_string()).await {
        tracing::warn!("admin login rate limit hit for {}", addr.ip());
        return Err(ApiError::TooManyRequests);
    }

    let username = required(&payload.username, "username")?;
    let password = required(&payload.password, "password")?;

    let admin = db::admins::get_by_email(&state.pool, username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    verify_password(&admin.admin_password, password)?;

    let token = session::sign_session(SessionScope::Admin, admin.id, &state.session_key)
        .map_err(|_| ApiError::Internal("Failed to sign session token"))?;

    tracing::info!("admin {} logged in", admin.id);
    Ok((
        login_cookie(SessionScope::Admin, &token)?,
        Json(AdminLoginResponse {
            message: "Login successful",
            admin_id: admin.id,
        }),
    ))
}

async fn admin_logout(
    AdminSession(admin_id): AdminSession,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("admin {admin_id} logged out");
    Ok((
        logout_cookie(SessionScope::Admin)?,
        Json(MessageResponse {
            message: "Logout successful",
        }),
    ))
}

async fn user_login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.login_limiter.allow(&addr.ip().to_string()).await {
        tracing::warn!("user login rate limit hit for {}", addr.ip());
        return Err(ApiError::TooManyRequests);
    }

    let username = required(&payload.username, "username")?;
    let password = required(&payload.password, "password")?;

    let user = db::users::get_by_email(&state.pool, username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    verify_password(&user.password, password)?;

    let token = session::sign_session(SessionScope::User, user.id, &state.session_key)
        .map_err(|_| ApiError::Internal("Failed to sign session token"))?;

    tracing::info!("user {} logged in", user.id);
    Ok((
        login_cookie(SessionScope::User, &token)?,
        Json(UserLoginResponse {
            message: "Login successful",
            user_id: user.id,
        }),
    ))
}

async fn user_logout(UserSession(user_id): UserSession) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("user {user_id} logged out");
    Ok((
        logout_cookie(SessionScope::User)?,
        Json(MessageResponse {
            message: "Logout successful",
        }),
    ))
}
