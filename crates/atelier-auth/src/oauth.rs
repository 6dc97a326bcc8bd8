//! OAuth state/CSRF guard
//!
//! Issues the one-time state token bound to the short-lived cookie the
//! route layer sets when an OAuth flow starts, and checks it against
//! the value read back at the callback. The guard holds no state
//! across calls; statelessness is delegated entirely to the cookie.
//!
//! Known hardening gap, preserved deliberately: the cookie is cleared
//! on callback but nothing server-side marks the state value spent, so
//! a captured callback URL replays within the cookie's lifetime if the
//! cookie can be resent.

use subtle::ConstantTimeEq;

use crate::config::OAuthConfig;
use crate::crypto::random_token;
use crate::error::{AuthError, AuthResult};

/// Lifetime of the state cookie set by the route layer
pub const STATE_COOKIE_MAX_AGE_SECS: u64 = 600;

/// State tokens are 16 random bytes, hex-encoded
const STATE_TOKEN_BYTES: usize = 16;

/// Result of initiating an OAuth flow
#[derive(Debug, Clone)]
pub struct OAuthAuthorization {
    /// Provider authorization URL with the state embedded
    pub authorization_url: String,
    /// State token; the route layer mirrors it into a cookie
    pub state: String,
}

/// CSRF guard over the configured provider registry
#[derive(Clone)]
pub struct OAuthGuard {
    config: OAuthConfig,
}

impl OAuthGuard {
    pub fn new(config: OAuthConfig) -> Self {
        Self { config }
    }

    /// Generate a state token and the provider authorization URL
    /// carrying it
    pub fn issue_state(&self, provider: &str) -> AuthResult<OAuthAuthorization> {
        let provider_config = self
            .config
            .providers
            .get(provider)
            .ok_or_else(|| AuthError::UnknownProvider(provider.to_string()))?;

        let state = random_token(STATE_TOKEN_BYTES);

        let authorization_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            provider_config.authorize_url,
            urlencoding::encode(&provider_config.client_id),
            urlencoding::encode(&provider_config.redirect_uri),
            urlencoding::encode(&provider_config.scope),
            urlencoding::encode(&state),
        );

        Ok(OAuthAuthorization {
            authorization_url,
            state,
        })
    }

    /// Compare the state returned by the provider against the cookie
    /// value. Exact match or rejection; nothing in between.
    pub fn validate_state(&self, received: &str, expected: &str) -> bool {
        received.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthProviderConfig;

    fn guard() -> OAuthGuard {
        let mut config = OAuthConfig::default();
        config.providers.insert(
            "google".to_string(),
            OAuthProviderConfig {
                authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                client_id: "client-123".to_string(),
                redirect_uri: "https://app.example.com/oauth/google/callback".to_string(),
                scope: "openid email profile".to_string(),
            },
        );
        OAuthGuard::new(config)
    }

    #[test]
    fn test_issue_state_embeds_token() {
        let guard = guard();
        let auth = guard.issue_state("google").unwrap();

        assert_eq!(auth.state.len(), STATE_TOKEN_BYTES * 2);
        assert!(auth
            .authorization_url
            .starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(auth.authorization_url.contains("client_id=client-123"));
        assert!(auth.authorization_url.contains("response_type=code"));
        assert!(auth
            .authorization_url
            .contains(&format!("state={}", auth.state)));
    }

    #[test]
    fn test_redirect_uri_is_percent_encoded() {
        let guard = guard();
        let auth = guard.issue_state("google").unwrap();
        assert!(auth
            .authorization_url
            .contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Foauth%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn test_unknown_provider() {
        let guard = guard();
        assert!(matches!(
            guard.issue_state("myspace"),
            Err(AuthError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_state_validation() {
        let guard = guard();
        let auth = guard.issue_state("google").unwrap();

        assert!(guard.validate_state(&auth.state, &auth.state));
        assert!(!guard.validate_state(&auth.state, "something-else"));
        assert!(!guard.validate_state("", &auth.state));

        // Two flows never share a state value
        let other = guard.issue_state("google").unwrap();
        assert!(!guard.validate_state(&auth.state, &other.state));
    }
}
