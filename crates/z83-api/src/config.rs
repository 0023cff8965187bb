//! API configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Minimum signing secret length in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600); // 1 hour

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },
}

/// HMAC signing secret. Never printed.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_JWT_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: JwtSecret,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: JwtSecret) -> Self {
        Self {
            jwt_secret,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        Ok(Self {
            jwt_secret: JwtSecret::new(secret)?,
            token_ttl: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TOKEN_TTL),
        })
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Login/registration attempts per minute per client IP
    pub auth_rate_limit_per_minute: u32,
    /// Key rate limits on X-Forwarded-For / X-Real-IP. Only set behind a proxy that overwrites them.
    pub trust_proxy_headers: bool,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Root directory for uploaded profile documents
    pub upload_dir: PathBuf,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Defaults for everything except the signing secret.
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            auth_rate_limit_per_minute: 20,
            trust_proxy_headers: false,
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            upload_dir: PathBuf::from("uploads"),
            auth,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(AuthConfig::from_env()?);

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            auth_rate_limit_per_minute: std::env::var("AUTH_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.auth_rate_limit_per_minute),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.trust_proxy_headers),
            request_timeout: std::env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            auth: defaults.auth,
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_length_enforced() {
        assert_eq!(JwtSecret::new("").unwrap_err(), ConfigError::MissingSecret);
        assert_eq!(
            JwtSecret::new("short").unwrap_err(),
            ConfigError::SecretTooShort { min: MIN_JWT_SECRET_LENGTH, actual: 5 }
        );
        assert!(JwtSecret::new("x".repeat(MIN_JWT_SECRET_LENGTH)).is_ok());
    }

    #[test]
    fn test_secret_not_printed() {
        let secret = JwtSecret::new("a-very-long-signing-secret-for-tests-only").unwrap();
        let config = AuthConfig::new(secret);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("a-very-long-signing-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
