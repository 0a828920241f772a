use crate::db;
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SESSION_TTL_HOURS: i64 = 24;

/// Admin and user sessions are separate identity contexts carried in
/// separate cookies; a token signed for one scope never opens the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope {
    Admin,
    User,
}

impl SessionScope {
    pub fn cookie_name(&self) -> &'static str {
        match self {
            SessionScope::Admin => "admin_session",
            SessionScope::User => "user_session",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SessionScope::Admin => "admin",
            SessionScope::User => "user",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
    #[error("wrong scope")]
    Scope,
}

pub fn sign_session(scope: SessionScope, id: i64, key: &[u8]) -> Result<String, SessionError> {
    let exp = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    sign_session_at(scope, id, exp.timestamp(), key)
}

fn sign_session_at(
    scope: SessionScope,
    id: i64,
    exp: i64,
    key: &[u8],
) -> Result<String, SessionError> {
    let payload = format!("{}|{}|{}", scope.as_str(), id, exp);
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_session(
    token: &str,
    scope: SessionScope,
    key: &[u8],
) -> Result<i64, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::STANDARD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let pieces: Vec<&str> = payload.split('|').collect();
    if pieces.len() != 3 {
        return Err(SessionError::Invalid);
    }
    if pieces[0] != scope.as_str() {
        return Err(SessionError::Scope);
    }
    let id: i64 = pieces[1].parse().map_err(|_| SessionError::Invalid)?;
    let exp: i64 = pieces[2].parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(id)
}

pub fn extract_session(headers: &HeaderMap, scope: SessionScope) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookie.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == scope.cookie_name() {
                return Some(value.to_string());
            }
        }
    }
    None
}

pub fn session_cookie(scope: SessionScope, token: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        scope.cookie_name(),
        token
    )
}

pub fn clear_session_cookie(scope: SessionScope) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        scope.cookie_name()
    )
}

/// Authenticated admin principal for a request.
pub struct AdminSession(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);

        let token = extract_session(&parts.headers, SessionScope::Admin)
            .ok_or(ApiError::Unauthorized("Admin authentication required"))?;
        let admin_id =
            verify_session(&token, SessionScope::Admin, &state.session_key).map_err(|e| {
                tracing::warn!("admin session rejected: {e}");
                ApiError::Unauthorized("Admin authentication required")
            })?;

        // The cookie may outlive the account.
        if !db::admins::exists(&state.pool, admin_id).await? {
            return Err(ApiError::Unauthorized("Admin authentication required"));
        }

        Ok(AdminSession(admin_id))
    }
}

/// Authenticated user principal for a request.
pub struct UserSession(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);

        let token = extract_session(&parts.headers, SessionScope::User)
            .ok_or(ApiError::Unauthorized("User authentication required"))?;
        let user_id =
            verify_session(&token, SessionScope::User, &state.session_key).map_err(|e| {
                tracing::warn!("user session rejected: {e}");
                ApiError::Unauthorized("User authentication required")
            })?;

        if !db::users::exists(&state.pool, user_id).await? {
            return Err(ApiError::Unauthorized("User authentication required"));
        }

        Ok(UserSession(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn sign_verify_round_trip() {
        let token = sign_session(SessionScope::Admin, 42, KEY).unwrap();
        assert_eq!(verify_session(&token, SessionScope::Admin, KEY).unwrap(), 42);

        let token = sign_session(SessionScope::User, 7, KEY).unwrap();
        assert_eq!(verify_session(&token, SessionScope::User, KEY).unwrap(), 7);
    }

    #[test]
    fn scopes_do_not_cross() {
        let token = sign_session(SessionScope::User, 7, KEY).unwrap();
        assert!(matches!(
            verify_session(&token, SessionScope::Admin, KEY),
            Err(SessionError::Scope)
        ));
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let token = sign_session(SessionScope::User, 7, KEY).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload =
            general_purpose::STANDARD.encode(format!("user|9999|{}", i64::MAX));
        let forged = format!("{forged_payload}.{sig}");
        assert!(matches!(
            verify_session(&forged, SessionScope::User, KEY),
            Err(SessionError::Signature)
        ));
    }

    #[test]
    fn wrong_key_fails_signature() {
        let token = sign_session(SessionScope::User, 7, KEY).unwrap();
        assert!(matches!(
            verify_session(&token, SessionScope::User, b"another-key-entirely-32-bytes!!!"),
            Err(SessionError::Signature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = Utc::now().timestamp() - 10;
        let token = sign_session_at(SessionScope::User, 7, past, KEY).unwrap();
        assert!(matches!(
            verify_session(&token, SessionScope::User, KEY),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        assert!(matches!(
            verify_session("not-a-token", SessionScope::User, KEY),
            Err(SessionError::Invalid)
        ));
        assert!(matches!(
            verify_session("a.b", SessionScope::User, KEY),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn extracts_the_right_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin_session=tok-a; user_session=tok-u"),
        );
        assert_eq!(
            extract_session(&headers, SessionScope::Admin).as_deref(),
            Some("tok-a")
        );
        assert_eq!(
            extract_session(&headers, SessionScope::User).as_deref(),
            Some("tok-u")
        );
    }

    #[test]
    fn missing_cookie_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session(&headers, SessionScope::Admin), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie(SessionScope::User).contains("Max-Age=0"));
    }
}
