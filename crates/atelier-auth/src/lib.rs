//! Atelier Authentication Layer
//!
//! Token-based authentication for the Atelier platform:
//!
//! - **JWT Authentication**: hand-rolled compact JWS, HS256 only
//! - **Password Security**: Argon2id hashing (OWASP recommended)
//! - **Session Lifecycle**: issue/verify/revoke, one row per login
//! - **OAuth CSRF Guard**: cookie-bound one-time state tokens
//! - **Rate Limiting**: injected fixed-window counter
//!
//! # Security Properties
//!
//! - Constant-time signature and state comparisons
//! - Verification never branches on the token header's `alg`
//! - Token failures collapse to one opaque error (no signing oracle)
//! - Login failures collapse to one opaque error (no enumeration)
//! - Secrets are injected configuration; leaf modules are pure
//!   functions of their arguments and never read the environment
//!
//! # Architecture
//!
//! ```text
//! route handlers
//!       │
//!       ▼
//!  AuthService ──► OAuthGuard, FixedWindowLimiter
//!       │
//!       ├──► PasswordService (argon2id)
//!       ├──► jwt::issue / jwt::verify ──► crypto (hmac, b64url, rand)
//!       │                └── expiry::parse_expiry
//!       ▼
//!  AuthStore (external user/session store)
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod expiry;
pub mod jwt;
pub mod oauth;
pub mod password;
pub mod rate_limit;
pub mod service;
pub mod types;

pub use config::{AuthConfig, JwtConfig, OAuthConfig, OAuthProviderConfig, PasswordConfig, RateLimitConfig};
pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, TokenPayload};
pub use oauth::{OAuthAuthorization, OAuthGuard, STATE_COOKIE_MAX_AGE_SECS};
pub use password::PasswordService;
pub use rate_limit::FixedWindowLimiter;
pub use service::AuthService;
pub use types::{AuthSession, PublicUser};
