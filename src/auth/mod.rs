mod credentials;
mod middleware;
mod password;
mod session;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use middleware::{
    removal_cookie, require_session, resolve_session, session_cookie, SESSION_COOKIE,
};
pub use password::{hash_password, is_password_hash, verify_password, PasswordError};
pub use session::{generate_session_token, AuthSession, SessionManager};
