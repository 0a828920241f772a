use crate::db;
use crate::db::calls::NewCall;
use crate::domain::models::{CallType, CallbackStatus};
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::session::UserSession;
use crate::web::{required, MessageResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UpdateGreetingRequest {
    pub greeting_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDatasetRequest {
    pub dataset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub filter_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientEntry {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadClientDataRequest {
    pub client_data: Option<Vec<ClientEntry>>,
    pub call_type: Option<String>,
    pub ai_transmission_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogCallRequest {
    pub receiver_phone: Option<String>,
    pub receiver_name: Option<String>,
    pub call_type: Option<String>,
    pub conversation_history: Option<String>,
    pub ai_transmission_message: Option<String>,
    pub callback_status: Option<String>,
    pub call_done: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: db::users::UserProfile,
}

#[derive(Debug, Serialize)]
pub struct CallsResponse {
    pub calls: Vec<db::calls::Call>,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub greeting_message: String,
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub dataset: String,
}

#[derive(Debug, Serialize)]
pub struct LogCallResponse {
    pub message: &'static str,
    pub call_id: i64,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/user/viewInfo", get(view_info))
        .route("/api/user/updateGreetingMessage", post(update_greeting))
        .route("/api/user/getGreetingMessage", get(get_greeting))
        .route("/api/user/updateDataset", post(update_dataset))
        .route("/api/user/getDataset", get(get_dataset))
        .route("/api/user/viewCallHistory", get(view_call_history))
        .route("/api/user/getCallsByFilter", post(get_calls_by_filter))
        .route("/api/user/uploadClientData", post(upload_client_data))
        .route("/api/user/logCall", post(log_call))
        .with_state(state)
}

async fn view_info(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::users::get_by_id(&state.pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserResponse { user }))
}

async fn update_greeting(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<UpdateGreetingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let greeting = required(&payload.greeting_message, "greeting_message")?;

    let updated = db::call_data::update_greeting(&state.pool, user_id, greeting).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("No call data found for this user"));
    }
    Ok(Json(MessageResponse {
        message: "Greeting message updated successfully",
    }))
}

async fn get_greeting(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<GreetingResponse>, ApiError> {
    let greeting_message = db::call_data::get_greeting(&state.pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("No call data found for this user"))?;
    Ok(Json(GreetingResponse { greeting_message }))
}

async fn update_dataset(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<UpdateDatasetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let dataset = required(&payload.dataset, "dataset")?;

    let updated = db::call_data::update_dataset(&state.pool, user_id, dataset).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("No call data found for this user"));
    }
    Ok(Json(MessageResponse {
        message: "Dataset updated successfully",
    }))
}

async fn get_dataset(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<DatasetResponse>, ApiError> {
    let dataset = db::call_data::get_dataset(&state.pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("No call data found for this user"))?;
    Ok(Json(DatasetResponse { dataset }))
}

async fn view_call_history(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<CallsResponse>, ApiError> {
    let calls = db::calls::get_all_for_user(&state.pool, user_id).await?;
    if calls.is_empty() {
        return Err(ApiError::NotFound("No call history found for this user"));
    }
    Ok(Json(CallsResponse { calls }))
}

async fn get_calls_by_filter(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<FilterRequest>,
) -> Result<Json<CallsResponse>, ApiError> {
    let filter_type = required(&payload.filter_type, "filter_type")?;

    let calls = db::calls::filter(&state.pool, user_id, filter_type).await?;
    if calls.is_empty() {
        return Err(ApiError::NotFound(
            "No calls found for this user with the specified filter",
        ));
    }
    Ok(Json(CallsResponse { calls }))
}

/// Turn validated upload entries into call rows: fresh campaign calls start
/// with an empty conversation, no callback, and the not-done flag.
fn build_campaign_calls(
    user_id: i64,
    clients: Vec<(String, String)>,
    call_type: CallType,
    transmission_message: &str,
) -> Vec<NewCall> {
    clients
        .into_iter()
        .map(|(name, phone)| NewCall {
            user_id,
            receiver_name: Some(name),
            receiver_phone: phone,
            call_type,
            conversation_history: String::new(),
            ai_transmission_message: transmission_message.to_string(),
            callback_status: CallbackStatus::No,
            call_done: false,
        })
        .collect()
}

async fn upload_client_data(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<UploadClientDataRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let entries = payload
        .client_data
        .filter(|list| !list.is_empty())
        .ok_or_else(|| ApiError::validation("client_data is required"))?;

    let call_type = match payload.call_type.as_deref() {
        None => CallType::OneWay,
        Some(raw) => CallType::parse(raw)
            .ok_or_else(|| ApiError::validation("call_type must be '1way' or '2way'"))?,
    };
    let transmission_message = payload.ai_transmission_message.unwrap_or_default();

    let mut clients = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name = required(&entry.name, "client name")?;
        let phone = required(&entry.phone, "client phone")?;
        clients.push((name.to_string(), phone.to_string()));
    }

    let rows = build_campaign_calls(user_id, clients, call_type, &transmission_message);
    let inserted = db::calls::add_bulk(&state.pool, &rows).await?;
    db::users::increment_calls_made(&state.pool, user_id, inserted as i32).await?;

    tracing::info!("user {user_id} uploaded {inserted} campaign calls");
    Ok(Json(MessageResponse {
        message: "Client data uploaded successfully",
    }))
}

async fn log_call(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<LogCallRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let receiver_phone = required(&payload.receiver_phone, "receiver_phone")?;

    let call_type = match payload.call_type.as_deref() {
        None => CallType::OneWay,
        Some(raw) => CallType::parse(raw)
            .ok_or_else(|| ApiError::validation("call_type must be '1way' or '2way'"))?,
    };
    let callback_status = match payload.callback_status.as_deref() {
        None => CallbackStatus::No,
        Some(raw) => CallbackStatus::parse(raw).ok_or_else(|| {
            ApiError::validation(
                "callback_status must be one of yes, no, callback_done, callback_needed",
            )
        })?,
    };

    let call = NewCall {
        user_id,
        receiver_name: payload.receiver_name.clone(),
        receiver_phone: receiver_phone.to_string(),
        call_type,
        conversation_history: payload.conversation_history.clone().unwrap_or_default(),
        ai_transmission_message: payload.ai_transmission_message.clone().unwrap_or_default(),
        callback_status,
        call_done: payload.call_done.unwrap_or(false),
    };

    let call_id = db::calls::add(&state.pool, &call).await?;
    db::users::increment_calls_made(&state.pool, user_id, 1).await?;

    Ok((
        StatusCode::CREATED,
        Json(LogCallResponse {
            message: "Call recorded successfully",
            call_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_calls_start_fresh() {
        let rows = build_campaign_calls(
            7,
            vec![("Bob".to_string(), "+1555".to_string())],
            CallType::OneWay,
            "Hi Bob",
        );

        assert_eq!(rows.len(), 1);
        let call = &rows[0];
        assert_eq!(call.user_id, 7);
        assert_eq!(call.receiver_name.as_deref(), Some("Bob"));
        assert_eq!(call.receiver_phone, "+1555");
        assert_eq!(call.call_type, CallType::OneWay);
        assert_eq!(call.conversation_history, "");
        assert_eq!(call.ai_transmission_message, "Hi Bob");
        assert_eq!(call.callback_status, CallbackStatus::No);
        assert!(!call.call_done);
    }

    #[test]
    fn upload_payload_tolerates_missing_optionals() {
        let payload: UploadClientDataRequest = serde_json::from_str(
            r#"{"client_data":[{"name":"Bob","phone":"+1555"}]}"#,
        )
        .unwrap();

        let entries = payload.client_data.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_deref(), Some("Bob"));
        assert_eq!(entries[0].phone.as_deref(), Some("+1555"));
        assert_eq!(payload.call_type, None);
        assert_eq!(payload.ai_transmission_message, None);
    }

    #[test]
    fn campaign_calls_keep_client_order() {
        let clients = vec![
            ("Ann".to_string(), "+1001".to_string()),
            ("Ben".to_string(), "+1002".to_string()),
            ("Cyd".to_string(), "+1003".to_string()),
        ];
        let rows = build_campaign_calls(1, clients, CallType::TwoWay, "");

        let phones: Vec<&str> = rows.iter().map(|c| c.receiver_phone.as_str()).collect();
        assert_eq!(phones, ["+1001", "+1002", "+1003"]);
        assert!(rows.iter().all(|c| c.call_type == CallType::TwoWay));
    }
}
