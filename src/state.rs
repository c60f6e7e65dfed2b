use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{CredentialVerifier, SessionManager};
use crate::config::ServerConfig;
use crate::storage::ListStore;

/// Main server state shared across all handlers
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn ListStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub sessions: SessionManager,
    cookie_key: Key,
    start_time: Instant,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn ListStore>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let sessions = SessionManager::new(config.session_timeout_seconds);
        let cookie_key = derive_cookie_key(&config.secret_key);

        Self {
            config: Arc::new(config),
            store,
            credentials,
            sessions,
            cookie_key,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Cookie signing key derived from the configured secret of any length
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

impl FromRef<ServerState> for Key {
    fn from_ref(state: &ServerState) -> Self {
        state.cookie_key.clone()
    }
}
