//! Authentication error types
//!
//! The taxonomy is deliberately coarse on the failure side:
//! every way a token can be bad collapses into [`AuthError::InvalidToken`],
//! and every way a login can fail collapses into
//! [`AuthError::InvalidCredentials`]. Distinguishing the causes would
//! hand an attacker an oracle (signing-key probing, account
//! enumeration). Raw errors from the hashing and signing primitives
//! never cross the service boundary.

use thiserror::Error;

use atelier_store::StoreError;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed, tampered, or expired token; never says which
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Unknown email, passwordless account, or wrong password;
    /// never says which
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already registered; surfaced distinctly so the client
    /// can prompt for a different one
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Password rejected before hashing (length cap)
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Unknown OAuth provider name
    #[error("Unknown OAuth provider: {0}")]
    UnknownProvider(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, try again in {retry_after} seconds")]
    RateLimitExceeded {
        /// Seconds until the window resets
        retry_after: u64,
    },

    /// Configuration error, fatal at construction, never recovered
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store failure, propagated unchanged (no retry)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal error (should not be exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::WeakPassword(_) | Self::UnknownProvider(_) => 400,
            Self::InvalidToken | Self::InvalidCredentials => 401,
            Self::DuplicateEmail | Self::Store(StoreError::Duplicate(_)) => 409,
            Self::Store(StoreError::NotFound(_)) => 404,
            Self::RateLimitExceeded { .. } => 429,
            Self::Config(_) | Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Get an error code for the client (safe to expose)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::Config(_) | Self::Store(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Store(_) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::DuplicateEmail.status_code(), 409);
        assert_eq!(
            AuthError::RateLimitExceeded { retry_after: 60 }.status_code(),
            429
        );
        assert_eq!(
            AuthError::Store(StoreError::Connection("down".to_string())).status_code(),
            500
        );
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = AuthError::Store(StoreError::Connection(
            "postgres://user:hunter2@db".to_string(),
        ));
        assert!(!err.client_message().contains("hunter2"));
    }

    #[test]
    fn test_token_errors_are_indistinct() {
        // One variant, one message, for every token failure mode
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Invalid or expired token"
        );
    }
}
