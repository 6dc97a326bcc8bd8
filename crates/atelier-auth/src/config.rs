//! Authentication configuration
//!
//! All configuration is explicit and injected at construction; no
//! component below the service reads the environment itself. The JWT
//! codec and expiry parser in particular are pure functions of their
//! arguments.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::expiry::parse_expiry;

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
    /// OAuth provider configuration
    pub oauth: OAuthConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC key for signing and verification (at least 32 characters)
    pub secret: String,
    /// Token and session lifetime, expiry-grammar string ("15m", "7d")
    pub expiry: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set in production
            expiry: "15m".to_string(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: usize,
    /// Maximum password length in bytes (hashing-cost DoS guard)
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 1,
            hash_length: 32,
            max_password_length: 128,
        }
    }
}

/// OAuth provider registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Providers by name ("google", "github")
    pub providers: HashMap<String, OAuthProviderConfig>,
}

/// A single OAuth provider's authorization endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    /// Authorization endpoint base URL
    pub authorize_url: String,
    /// Our client id at the provider
    pub client_id: String,
    /// Callback URL registered with the provider
    pub redirect_uri: String,
    /// Space-separated scope list
    pub scope: String,
}

/// Fixed-window rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Requests per window per client key
    pub max_requests: u32,
    /// Window duration
    #[serde(with = "humantime_serde")]
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 20,
            window: Duration::from_secs(60),
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables.
    ///
    /// `JWT_SECRET` must be provided; `JWT_EXPIRY` falls back to
    /// `"15m"`. Providers are registered when their client id is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(expiry) = std::env::var("JWT_EXPIRY") {
            config.jwt.expiry = expiry;
        }

        if let Ok(client_id) = std::env::var("GOOGLE_CLIENT_ID") {
            config.oauth.providers.insert(
                "google".to_string(),
                OAuthProviderConfig {
                    authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                    client_id,
                    redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").unwrap_or_default(),
                    scope: "openid email profile".to_string(),
                },
            );
        }
        if let Ok(client_id) = std::env::var("GITHUB_CLIENT_ID") {
            config.oauth.providers.insert(
                "github".to_string(),
                OAuthProviderConfig {
                    authorize_url: "https://github.com/login/oauth/authorize".to_string(),
                    client_id,
                    redirect_uri: std::env::var("GITHUB_REDIRECT_URI").unwrap_or_default(),
                    scope: "read:user user:email".to_string(),
                },
            );
        }

        config
    }

    /// Validate the configuration, collecting every problem.
    ///
    /// The service refuses to construct on any failure: running with a
    /// weak or absent secret is never an option.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.jwt.secret.is_empty() {
            errors.push("JWT secret must be set".to_string());
        } else if self.jwt.secret.len() < 32 {
            errors.push("JWT secret must be at least 32 characters".to_string());
        }

        if let Err(e) = parse_expiry(&self.jwt.expiry) {
            errors.push(e.to_string());
        }

        for (name, provider) in &self.oauth.providers {
            if provider.authorize_url.is_empty() {
                errors.push(format!("OAuth provider {} has no authorize URL", name));
            }
            if provider.client_id.is_empty() {
                errors.push(format!("OAuth provider {} has no client id", name));
            }
            if provider.redirect_uri.is_empty() {
                errors.push(format!("OAuth provider {} has no redirect URI", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
