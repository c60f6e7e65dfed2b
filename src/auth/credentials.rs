use tracing::warn;

use crate::auth::password::{hash_password, is_password_hash, verify_password, PasswordError};
use crate::config::ServerConfig;

/// Checks a username/password pair.
///
/// Handlers only see this trait, so the single configured identity can be
/// swapped for a user store without touching the HTTP contract.
pub trait CredentialVerifier: Send + Sync {
    /// True iff the pair identifies a valid user. Must fail closed.
    fn verify_credentials(&self, username: &str, password: &str) -> bool;
}

/// One fixed identity whose password hash is held in memory for the process lifetime
pub struct StaticCredentials {
    username: String,
    password_hash: String,
}

impl StaticCredentials {
    /// Use an existing Argon2 PHC hash
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, PasswordError> {
        let password_hash = password_hash.into();
        if !is_password_hash(&password_hash) {
            return Err(PasswordError::InvalidHash);
        }
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// Hash a plaintext password once and keep only the hash
    pub fn from_password(
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// Credentials described by the server configuration; a configured hash wins
    pub fn from_config(config: &ServerConfig) -> Result<Self, PasswordError> {
        match &config.login_password_hash {
            Some(hash) => Self::new(config.login_username.clone(), hash.clone()),
            None => Self::from_password(config.login_username.clone(), &config.login_password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify_credentials(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }

        match verify_password(password, &self.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification error: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials() {
        let credentials = StaticCredentials::from_password("admin", "changeme").unwrap();

        assert_eq!(credentials.username(), "admin");
        assert!(credentials.verify_credentials("admin", "changeme"));
        assert!(!credentials.verify_credentials("admin", "wrong"));
        assert!(!credentials.verify_credentials("root", "changeme"));
        assert!(!credentials.verify_credentials("", ""));
    }

    #[test]
    fn test_precomputed_hash() {
        let hash = hash_password("hunter22").unwrap();
        let credentials = StaticCredentials::new("alice", hash).unwrap();

        assert!(credentials.verify_credentials("alice", "hunter22"));
        assert!(StaticCredentials::new("alice", "plaintext").is_err());
    }

    #[test]
    fn test_from_config_prefers_hash() {
        let hash = hash_password("from-hash").unwrap();
        let config = ServerConfig {
            login_password: "from-plaintext".to_string(),
            login_password_hash: Some(hash),
            ..ServerConfig::default()
        };
        let credentials = StaticCredentials::from_config(&config).unwrap();

        assert!(credentials.verify_credentials("admin", "from-hash"));
        assert!(!credentials.verify_credentials("admin", "from-plaintext"));
    }
}
