use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use crate::auth::session::{AuthSession, SessionManager};
use crate::error::ApiError;
use crate::state::ServerState;

/// Name of the signed cookie carrying the session token
pub const SESSION_COOKIE: &str = "lxsts_session";

/// Session cookie: lax same-site, not readable from scripts, no explicit expiry
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie used to clear the session on the client
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Resolve the session named by a correctly signed cookie, if it is still active
pub fn resolve_session(sessions: &SessionManager, jar: &SignedCookieJar) -> Option<AuthSession> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| sessions.validate_token(cookie.value()))
}

/// Authentication middleware for protected routes.
///
/// On success the verified [`AuthSession`] is stored in the request
/// extensions for handlers to extract.
pub async fn require_session(
    State(state): State<ServerState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = resolve_session(&state.sessions, &jar) else {
        return ApiError::Unauthorized("Authentication required".to_string()).into_response();
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}
