use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_USERNAME: &str = "admin";
/// Development-only password; a warning is logged when it is in use
pub const DEFAULT_PASSWORD: &str = "changeme";
/// Development-only signing secret; a warning is logged when it is in use
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Server configuration loaded from environment variables
#[derive(Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind address (0.0.0.0 for LAN, 127.0.0.1 for localhost)
    pub bind_addr: String,
    /// The single username allowed to log in
    pub login_username: String,
    /// Plaintext password, hashed once at startup
    pub login_password: String,
    /// Pre-computed Argon2 hash, used instead of `login_password` when set
    pub login_password_hash: Option<String>,
    /// Secret used to sign session cookies
    pub secret_key: String,
    /// Debug mode (verbose logging)
    pub debug: bool,
    /// Directory holding one JSON file per list
    pub data_directory: PathBuf,
    /// Frontend assets served at `/`
    pub static_directory: Option<PathBuf>,
    /// CORS allowed origins (comma-separated in env var)
    pub cors_origins: Vec<String>,
    /// Server-side session lifetime in seconds
    pub session_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: "0.0.0.0".to_string(),
            login_username: DEFAULT_USERNAME.to_string(),
            login_password: DEFAULT_PASSWORD.to_string(),
            login_password_hash: None,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            debug: false,
            data_directory: PathBuf::from("data/lists"),
            static_directory: None,
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:80".to_string(),
                "http://localhost:5123".to_string(),
                "http://127.0.0.1".to_string(),
                "http://127.0.0.1:5123".to_string(),
            ],
            session_timeout_seconds: 31 * 24 * 3600,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from a key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let login_username = lookup("LOGIN_USERNAME").unwrap_or(defaults.login_username);
        if login_username.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "LOGIN_USERNAME must not be empty".to_string(),
            ));
        }

        let secret_key = lookup("SECRET_KEY").unwrap_or(defaults.secret_key);
        if secret_key.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SECRET_KEY must not be empty".to_string(),
            ));
        }

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);
        // Credentialed CORS cannot use a wildcard origin
        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::InvalidValue(
                "CORS_ORIGINS must list explicit origins, not *".to_string(),
            ));
        }

        Ok(Self {
            port: match lookup("LXSTS_PORT") {
                Some(port) => port.trim().parse().map_err(|_| ConfigError::InvalidPort)?,
                None => defaults.port,
            },
            bind_addr: lookup("LXSTS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            login_username,
            login_password: lookup("LOGIN_PASSWORD").unwrap_or(defaults.login_password),
            login_password_hash: lookup("LOGIN_PASSWORD_HASH").filter(|h| !h.is_empty()),
            secret_key,
            debug: lookup("DEBUG").map(|v| parse_flag(&v)).unwrap_or(defaults.debug),
            data_directory: lookup("DATA_DIRECTORY")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_directory),
            static_directory: lookup("STATIC_DIRECTORY")
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
            cors_origins,
            session_timeout_seconds: lookup("SESSION_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.session_timeout_seconds),
        })
    }

    /// Get the full bind address (addr:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// True when the development password is the active credential
    pub fn uses_default_password(&self) -> bool {
        self.login_password_hash.is_none() && self.login_password == DEFAULT_PASSWORD
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Default tracing filter when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "lxsts_server=debug,tower_http=debug"
        } else {
            "lxsts_server=info,tower_http=info"
        }
    }
}

// Secrets stay out of logs
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("login_username", &self.login_username)
            .field("login_password", &"<redacted>")
            .field("login_password_hash", &self.login_password_hash.as_ref().map(|_| "<redacted>"))
            .field("secret_key", &"<redacted>")
            .field("debug", &self.debug)
            .field("data_directory", &self.data_directory)
            .field("static_directory", &self.static_directory)
            .field("cors_origins", &self.cors_origins)
            .field("session_timeout_seconds", &self.session_timeout_seconds)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.login_username, "admin");
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert!(config.uses_default_password());
        assert!(config.uses_default_secret());
        assert!(!config.debug);
        assert!(config.static_directory.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("LOGIN_USERNAME", "alice"),
            ("LOGIN_PASSWORD", "s3cret-pass"),
            ("SECRET_KEY", "another-secret"),
            ("DEBUG", "True"),
            ("LXSTS_PORT", "8080"),
            ("LXSTS_BIND_ADDR", "127.0.0.1"),
            ("DATA_DIRECTORY", "/tmp/lists"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();

        assert_eq!(config.login_username, "alice");
        assert!(!config.uses_default_password());
        assert!(!config.uses_default_secret());
        assert!(config.debug);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.data_directory, PathBuf::from("/tmp/lists"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.default_log_filter(), "lxsts_server=debug,tower_http=debug");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("LXSTS_PORT", "eighty")])),
            Err(ConfigError::InvalidPort)
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("LOGIN_USERNAME", " ")])),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("CORS_ORIGINS", "http://a.test, *")])),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig {
            secret_key: "top-secret".to_string(),
            ..ServerConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(!rendered.contains(DEFAULT_PASSWORD));
    }
}
