//! Atelier Persistence Layer
//!
//! Abstract user/session store consumed by the authentication layer.
//! The real deployment backs this with the application database; tests
//! and single-binary setups use [`MemoryStore`]. Either way the auth
//! service only sees [`AuthStore`] and plain records; no query or
//! ORM semantics cross the boundary.

pub mod error;
pub mod memory;
pub mod models;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;

use uuid::Uuid;

/// Store operations required by the auth service.
///
/// Lookups return `Ok(None)` for missing rows; only constraint
/// violations and store failures are errors. Unique-email enforcement
/// lives here: callers may pre-check, but the store is the final
/// authority.
#[async_trait::async_trait]
pub trait AuthStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Create the user row and its profile row together; atomic in
    /// real backends.
    async fn create_user_with_profile(&self, new_user: NewUser) -> StoreResult<UserRecord>;

    /// Lookup by the full (email, provider, provider id) triple
    async fn find_oauth_user(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
    ) -> StoreResult<Option<UserRecord>>;

    async fn create_oauth_user_record(&self, new_user: NewUser) -> StoreResult<UserRecord>;

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    /// Field merge, last-write-wins
    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<ProfileRecord>;

    /// One row per login; never an upsert
    async fn create_session(&self, new_session: NewSession) -> StoreResult<SessionRecord>;

    /// Returns whether a row existed; absence is not an error
    async fn delete_session_by_token(&self, access_token: &str) -> StoreResult<bool>;
}
