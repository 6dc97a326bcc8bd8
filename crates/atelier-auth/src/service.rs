//! Auth service orchestration
//!
//! The top-level contract consumed by route handlers. Everything below
//! this module is pure or store-agnostic; everything above it is HTTP.
//! Store errors propagate unchanged: the store is trusted to be
//! available, and a transient failure surfaces as a 5xx-equivalent.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use atelier_store::{
    AuthStore, NewSession, NewUser, ProfileChanges, ProfileRecord, StoreError, UserRecord,
    UserRole,
};

use crate::config::AuthConfig;
use crate::crypto::random_token;
use crate::error::{AuthError, AuthResult};
use crate::expiry::parse_expiry;
use crate::jwt::{self, Claims, TokenPayload};
use crate::oauth::OAuthGuard;
use crate::password::PasswordService;
use crate::types::{AuthSession, PublicUser};

/// Refresh tokens are 32 random bytes, hex-encoded
const REFRESH_TOKEN_BYTES: usize = 32;

/// Orchestrates register/login/logout/OAuth-login over the injected
/// store and the crypto primitives
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    password: PasswordService,
    oauth: OAuthGuard,
    config: AuthConfig,
    /// Real digest verified against when no account (or no password)
    /// exists, so the miss path costs the same as a mismatch
    dummy_digest: String,
}

impl AuthService {
    /// Construct the service, validating configuration first. A weak
    /// or absent JWT secret refuses to start.
    pub fn new(store: Arc<dyn AuthStore>, config: AuthConfig) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|errors| AuthError::Config(errors.join("; ")))?;

        let password = PasswordService::new(config.password.clone());
        let dummy_digest = password.hash(&random_token(16))?;
        let oauth = OAuthGuard::new(config.oauth.clone());

        Ok(Self {
            store,
            password,
            oauth,
            config,
            dummy_digest,
        })
    }

    /// The OAuth state/CSRF guard for the route layer
    pub fn oauth(&self) -> &OAuthGuard {
        &self.oauth
    }

    /// Register a new password account.
    ///
    /// The pre-hash duplicate check keeps us from burning an Argon2
    /// run on a known-taken email; the store's unique constraint
    /// remains the final authority on the race.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> AuthResult<AuthSession> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.password.hash(password)?;

        let user = self
            .store
            .create_user_with_profile(NewUser {
                email: email.to_string(),
                password_hash: Some(password_hash),
                role: UserRole::Member,
                oauth_provider: None,
                oauth_provider_id: None,
                display_name: name.map(str::to_string),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::DuplicateEmail,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        self.issue_session(&user, None).await
    }

    /// Authenticate a password account.
    ///
    /// Unknown email, OAuth-only account, and wrong password are
    /// indistinguishable to the caller, and the first two still pay
    /// for a digest verification so none of them is faster either.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let user = self.store.find_user_by_email(email).await?;

        let Some(user) = user else {
            self.password.verify(password, &self.dummy_digest);
            return Err(AuthError::InvalidCredentials);
        };
        let Some(ref digest) = user.password_hash else {
            self.password.verify(password, &self.dummy_digest);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.password.verify(password, digest) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.issue_session(&user, None).await
    }

    /// Delete the session row keyed by the access token. Idempotent:
    /// a missing session is a no-op, not an error.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        let existed = self.store.delete_session_by_token(token).await?;
        if existed {
            tracing::info!("session revoked");
        } else {
            tracing::debug!("logout for unknown session, ignoring");
        }
        Ok(())
    }

    /// Missing user is `None`, not an error; the route layer picks
    /// the status
    pub async fn get_user_by_id(&self, id: Uuid) -> AuthResult<Option<PublicUser>> {
        let user = self.store.get_user_by_id(id).await?;
        Ok(user.as_ref().map(PublicUser::from_record))
    }

    /// Field merge, last-write-wins. Shape validation happens at the
    /// route layer's schema boundary.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> AuthResult<ProfileRecord> {
        Ok(self.store.update_user_profile(user_id, changes).await?)
    }

    /// Login-or-create for an OAuth callback.
    ///
    /// The (email, provider, provider id) triple is the sole join
    /// key: a pre-existing password account with the same email is
    /// never merged, and gets a second, separate account.
    pub async fn create_oauth_user(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
        name: Option<&str>,
    ) -> AuthResult<AuthSession> {
        let existing = self
            .store
            .find_oauth_user(email, provider, provider_id)
            .await?;

        let user = match existing {
            Some(user) => user,
            None => {
                let user = self
                    .store
                    .create_oauth_user_record(NewUser {
                        email: email.to_string(),
                        password_hash: None,
                        role: UserRole::Member,
                        oauth_provider: Some(provider.to_string()),
                        oauth_provider_id: Some(provider_id.to_string()),
                        display_name: name.map(str::to_string),
                    })
                    .await?;
                tracing::info!(user_id = %user.id, provider, "oauth user created");
                user
            }
        };

        self.issue_session(&user, Some(provider.to_string())).await
    }

    /// Verify an access token against the configured secret;
    /// convenience for route middleware
    pub fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        jwt::verify(token, &self.config.jwt.secret)
    }

    /// Sign a JWT, mint a refresh token, persist the session row.
    ///
    /// The row's `expires_at` is computed from the expiry spec
    /// independently of the JWT's own `exp` claim; both derive from
    /// the same spec but are stored separately.
    async fn issue_session(
        &self,
        user: &UserRecord,
        device: Option<String>,
    ) -> AuthResult<AuthSession> {
        let payload = TokenPayload::new(user.id, &user.email, user.role);
        let token = jwt::issue(&payload, &self.config.jwt.secret, &self.config.jwt.expiry)?;
        let refresh_token = random_token(REFRESH_TOKEN_BYTES);

        // Checked arithmetic: an enormous expiry spec must fail, not
        // wrap into a backdated row
        let out_of_range =
            || AuthError::Config(format!("expiry {:?} out of range", self.config.jwt.expiry));
        let lifetime_ms = parse_expiry(&self.config.jwt.expiry)?;
        let lifetime = Duration::milliseconds(i64::try_from(lifetime_ms).map_err(|_| out_of_range())?);
        let expires_at = Utc::now()
            .checked_add_signed(lifetime)
            .ok_or_else(out_of_range)?;

        self.store
            .create_session(NewSession {
                user_id: user.id,
                access_token: token.clone(),
                refresh_token: refresh_token.clone(),
                device,
                expires_at,
            })
            .await?;

        Ok(AuthSession {
            user: PublicUser::from_record(user),
            token,
            refresh_token,
        })
    }
}
