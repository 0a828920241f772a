use crate::db;
use crate::domain::models::{CallbackStatus, DEFAULT_GREETING};
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::session::AdminSession;
use crate::web::{required, MessageResponse};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddAdminRequest {
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_whatsapp_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminIdRequest {
    pub admin_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub twilio_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserInfoRequest {
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub whatsapp_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCallStatusRequest {
    pub call_id: Option<i64>,
    pub callback_status: Option<String>,
    pub call_done: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AdminsResponse {
    pub admins: Vec<db::admins::AdminSummary>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<db::users::UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: db::users::UserProfile,
}

#[derive(Debug, Serialize)]
pub struct CallDataResponse {
    pub user_call_data: Vec<db::call_data::CallData>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/addAdmin", post(add_admin))
        .route("/api/admin/getAdmins", get(get_admins))
        .route("/api/admin/deleteAdmin", post(delete_admin))
        .route("/api/admin/addUser", post(add_user))
        .route("/api/admin/getUsers", get(get_users))
        .route("/api/admin/deleteUser", post(delete_user))
        .route("/api/admin/updateUserInfo", post(update_user_info))
        .route(
            "/api/admin/getUserCallDataByuserID",
            post(get_user_call_data),
        )
        .route("/api/admin/getUserInfo", post(get_user_info))
        .route("/api/admin/updateCallStatus", post(update_call_status))
        .with_state(state)
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(rand_core::OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal("Failed to hash password"))?
        .to_string())
}

async fn add_admin(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<AddAdminRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let admin_name = required(&payload.admin_name, "admin_name")?;
    let admin_email = required(&payload.admin_email, "admin_email")?;
    let admin_password = required(&payload.admin_password, "admin_password")?;

    let hash = hash_password(admin_password)?;
    let admin_id = db::admins::add(
        &state.pool,
        admin_name,
        admin_email,
        &hash,
        payload.admin_whatsapp_number.as_deref(),
    )
    .await
    .map_err(|e| ApiError::unique(e, "An admin with this email already exists"))?;

    tracing::info!("admin {admin_id} created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Admin added successfully",
        }),
    ))
}

async fn get_admins(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
) -> Result<Json<AdminsResponse>, ApiError> {
    let admins = db::admins::list(&state.pool).await?;
    Ok(Json(AdminsResponse { admins }))
}

async fn delete_admin(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<AdminIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let admin_id = payload
        .admin_id
        .ok_or_else(|| ApiError::validation("admin_id is required"))?;

    if db::admins::get_by_id(&state.pool, admin_id).await?.is_none() {
        return Err(ApiError::NotFound("Admin not found"));
    }
    db::admins::delete(&state.pool, admin_id).await?;

    tracing::info!("admin {admin_id} deleted");
    Ok(Json(MessageResponse {
        message: "Admin deleted successfully",
    }))
}

async fn add_user(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<AddUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_name = required(&payload.user_name, "user_name")?;
    let email = required(&payload.email, "email")?;
    let password = required(&payload.password, "password")?;

    let hash = hash_password(password)?;
    let user_id = db::users::add(
        &state.pool,
        user_name,
        email,
        &hash,
        payload.company_name.as_deref(),
        payload.whatsapp_number.as_deref(),
    )
    .await
    .map_err(|e| ApiError::unique(e, "A user with this name or email already exists"))?;

    // Every user starts with an empty dataset and the stock greeting.
    db::call_data::add(
        &state.pool,
        user_id,
        payload.twilio_phone_number.as_deref(),
        "",
        DEFAULT_GREETING,
    )
    .await?;

    tracing::info!("user {user_id} created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User added successfully",
        }),
    ))
}

async fn get_users(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = db::users::list(&state.pool).await?;
    Ok(Json(UsersResponse { users }))
}

async fn delete_user(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<UserIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    if db::users::get_by_id(&state.pool, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found"));
    }
    db::users::delete(&state.pool, user_id).await?;

    tracing::info!("user {user_id} deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

async fn update_user_info(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<UpdateUserInfoRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;
    let user_name = required(&payload.user_name, "user_name")?;
    let email = required(&payload.email, "email")?;

    let updated = db::users::update_info(
        &state.pool,
        user_id,
        user_name,
        email,
        payload.company_name.as_deref(),
        payload.whatsapp_number.as_deref(),
    )
    .await
    .map_err(|e| ApiError::unique(e, "A user with this name or email already exists"))?;

    if updated == 0 {
        return Err(ApiError::NotFound("User not found"));
    }
    Ok(Json(MessageResponse {
        message: "User info updated successfully",
    }))
}

async fn get_user_call_data(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<UserIdRequest>,
) -> Result<Json<CallDataResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    let user_call_data = db::call_data::get_all_for_user(&state.pool, user_id).await?;
    if user_call_data.is_empty() {
        return Err(ApiError::NotFound("No call data found for this user"));
    }
    Ok(Json(CallDataResponse { user_call_data }))
}

async fn get_user_info(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<UserIdRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    let user = db::users::get_by_id(&state.pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserResponse { user }))
}

/// Call outcomes are reported through the privileged side; a tenant cannot
/// rewrite another tenant's records this way.
async fn update_call_status(
    AdminSession(_): AdminSession,
    State(state): State<SharedState>,
    Json(payload): Json<UpdateCallStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let call_id = payload
        .call_id
        .ok_or_else(|| ApiError::validation("call_id is required"))?;
    let raw_status = required(&payload.callback_status, "callback_status")?;
    let callback_status = CallbackStatus::parse(raw_status).ok_or_else(|| {
        ApiError::validation(
            "callback_status must be one of yes, no, callback_done, callback_needed",
        )
    })?;
    let call_done = payload
        .call_done
        .ok_or_else(|| ApiError::validation("call_done is required"))?;

    let updated =
        db::calls::update_status(&state.pool, call_id, callback_status, call_done).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Call not found"));
    }
    Ok(Json(MessageResponse {
        message: "Call status updated successfully",
    }))
}
