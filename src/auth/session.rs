use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;

/// Generate a secure random session token (64 hex characters)
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A verified session, resolved once per request and handed to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
}

struct ActiveSession {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session manager for logged-in clients
#[derive(Clone)]
pub struct SessionManager {
    /// Active sessions indexed by session token
    sessions: Arc<RwLock<HashMap<String, ActiveSession>>>,
    timeout_seconds: u64,
}

impl SessionManager {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout_seconds,
        }
    }

    /// Start a session for `username` and return its token
    pub fn create_session(&self, username: &str) -> String {
        let token = generate_session_token();
        let timeout = i64::try_from(self.timeout_seconds).unwrap_or(i64::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(Duration::try_seconds(timeout).unwrap_or(Duration::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.sessions.write().insert(
            token.clone(),
            ActiveSession {
                username: username.to_string(),
                expires_at,
            },
        );

        token
    }

    /// Validate a session token and return the session if valid
    pub fn validate_token(&self, token: &str) -> Option<AuthSession> {
        let sessions = self.sessions.read();
        sessions
            .get(token)
            .filter(|session| Utc::now() < session.expires_at)
            .map(|session| AuthSession {
                token: token.to_string(),
                username: session.username.clone(),
            })
    }

    /// Revoke a session
    pub fn revoke_session(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    /// Clean up expired sessions
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
