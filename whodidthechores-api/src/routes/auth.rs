/// Session endpoints
///
/// Signup and login answer with the `session` cookie; logout answers with the
/// same cookie already expired.
///
/// # Endpoints
///
/// - `POST /auth/signup` - Create an account and open a session
/// - `POST /auth/login` - Open a session
/// - `POST /auth/logout` - Close the current session
/// - `GET /auth/session` - Who the current session belongs to

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whodidthechores_shared::{
    auth::cookie::{expired_session_cookie, session_cookie, session_id_from_cookie_header},
    models::AuthenticatedSession,
};

/// Signup and login request
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub name: String,
    pub password: String,
}

/// Current session, as shown to its owner
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: i32,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthenticatedSession> for SessionResponse {
    fn from(found: &AuthenticatedSession) -> Self {
        Self {
            user_id: found.user.id,
            name: found.user.name.clone(),
            expires_at: found.session.expires_at,
        }
    }
}

/// Register a new user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: password too easy to guess
/// - `409 Conflict`: name already taken
/// - `400 Bad Request`: empty name
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let opened = state.sessions.sign_up(&req.name, &req.password).await?;
    Ok(with_session_cookie(StatusCode::CREATED, &opened))
}

/// Login
///
/// # Errors
///
/// - `401 Unauthorized`: unknown name or wrong password, indistinguishably
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let opened = state.sessions.login(&req.name, &req.password).await?;
    Ok(with_session_cookie(StatusCode::OK, &opened))
}

/// Logout
///
/// Always clears the cookie, whether or not a session was attached and
/// even when the server-side delete fails.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let outcome = match session_id(&headers) {
        Some(session_id) => state.sessions.logout(session_id).await,
        None => Ok(()),
    };
    let cleared = AppendHeaders([(header::SET_COOKIE, expired_session_cookie().to_string())]);

    match outcome {
        Ok(()) => (StatusCode::NO_CONTENT, cleared).into_response(),
        Err(e) => (cleared, ApiError::from(e)).into_response(),
    }
}

/// Current session
///
/// # Errors
///
/// - `401 Unauthorized`: no cookie, or the session is unknown or expired
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let session_id = session_id(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing session cookie".to_string()))?;

    let found = state.sessions.get_session(session_id).await?;
    Ok(Json(SessionResponse::from(&found)))
}

fn with_session_cookie(status: StatusCode, opened: &AuthenticatedSession) -> impl IntoResponse {
    (
        status,
        AppendHeaders([(header::SET_COOKIE, session_cookie(&opened.session).to_string())]),
        Json(SessionResponse::from(opened)),
    )
}

/// Session id from the request cookies. Browsers may split cookies over
/// several `Cookie` headers.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_id_from_cookie_header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_any_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_str(&format!("lang=fr; session={}", id)).unwrap(),
        );

        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_ignores_malformed_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=not-a-uuid"));

        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }
}
