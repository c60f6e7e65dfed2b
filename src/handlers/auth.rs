use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{removal_cookie, resolve_session, session_cookie};
use crate::error::ApiError;
use crate::handlers::body::{json_object, provided_field};
use crate::state::ServerState;

/// Login/logout response
#[derive(Debug, Serialize)]
pub struct AuthMessage {
    pub success: bool,
    pub message: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Login endpoint: verifies the credentials and issues a session cookie
pub async fn login(
    State(state): State<ServerState>,
    jar: SignedCookieJar,
    body: Bytes,
) -> Result<(SignedCookieJar, Json<AuthMessage>), ApiError> {
    let data = json_object(&body)?;
    let (Some(username), Some(password)) = (
        provided_field(&data, "username"),
        provided_field(&data, "password"),
    ) else {
        return Err(ApiError::BadRequest(
            "Username and password required".to_string(),
        ));
    };

    // Present but not strings: nothing can match
    let (Some(username), Some(password)) = (username.as_str(), password.as_str()) else {
        warn!("Failed login attempt with non-string credentials");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };
    let username = username.to_string();
    let password = password.to_string();

    // Argon2 verification is CPU-bound
    let verifier = state.credentials.clone();
    let candidate = username.clone();
    let valid =
        tokio::task::spawn_blocking(move || verifier.verify_credentials(&candidate, &password))
            .await
            .unwrap_or(false);

    if !valid {
        warn!("Failed login attempt for user: {}", username);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    // A fresh login replaces whatever session the client carried
    if let Some(previous) = resolve_session(&state.sessions, &jar) {
        state.sessions.revoke_session(&previous.token);
    }

    let token = state.sessions.create_session(&username);
    info!("User {} logged in", username);

    Ok((
        jar.add(session_cookie(token)),
        Json(AuthMessage {
            success: true,
            message: "Login successful".to_string(),
        }),
    ))
}

/// Logout endpoint: always succeeds, revoking the session if there is one
pub async fn logout(
    State(state): State<ServerState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<AuthMessage>) {
    if let Some(session) = resolve_session(&state.sessions, &jar) {
        state.sessions.revoke_session(&session.token);
        info!("User {} logged out", session.username);
    }

    (
        jar.remove(removal_cookie()),
        Json(AuthMessage {
            success: true,
            message: "Logout successful".to_string(),
        }),
    )
}

/// Session status endpoint
pub async fn auth_status(
    State(state): State<ServerState>,
    jar: SignedCookieJar,
) -> Json<AuthStatusResponse> {
    match resolve_session(&state.sessions, &jar) {
        Some(session) => Json(AuthStatusResponse {
            authenticated: true,
            username: Some(session.username),
        }),
        None => Json(AuthStatusResponse {
            authenticated: false,
            username: None,
        }),
    }
}
