//! In-memory store
//!
//! Backs tests and database-less deployments. Enforces the same
//! uniqueness rules a SQL schema would: unique email, unique
//! (provider, provider id) pair. Uniqueness is claimed through the
//! index maps' `entry` API, which locks the key's shard across
//! check-and-insert, so concurrent creations of the same email or
//! identity leave exactly one winner.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    NewSession, NewUser, ProfileChanges, ProfileRecord, SessionRecord, UserRecord,
};
use crate::AuthStore;

/// Map-backed [`AuthStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, UserRecord>,
    profiles: DashMap<Uuid, ProfileRecord>,
    /// Keyed by access token, mirroring the revocation lookup path
    sessions: DashMap<String, SessionRecord>,
    /// Unique index: email -> user id
    emails: DashMap<String, Uuid>,
    /// Unique index: (provider, provider id) -> user id
    identities: DashMap<(String, String), Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live session rows, expired ones included
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Reserve the email slot and insert the user and profile rows.
    /// The entry guard makes the reserve atomic: a concurrent loser
    /// sees `Occupied` and gets `Duplicate`.
    fn insert_user(&self, new_user: NewUser) -> StoreResult<UserRecord> {
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            oauth_provider: new_user.oauth_provider,
            oauth_provider_id: new_user.oauth_provider_id,
            created_at: now,
            updated_at: now,
        };

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate(format!(
                    "email {} already exists",
                    user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.profiles.insert(
            user.id,
            ProfileRecord::empty(user.id, new_user.display_name),
        );
        self.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait::async_trait]
impl AuthStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn create_user_with_profile(&self, new_user: NewUser) -> StoreResult<UserRecord> {
        self.insert_user(new_user)
    }

    async fn find_oauth_user(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
    ) -> StoreResult<Option<UserRecord>> {
        let key = (provider.to_string(), provider_id.to_string());
        let Some(id) = self.identities.get(&key).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn create_oauth_user_record(&self, new_user: NewUser) -> StoreResult<UserRecord> {
        let (Some(provider), Some(provider_id)) = (
            new_user.oauth_provider.clone(),
            new_user.oauth_provider_id.clone(),
        ) else {
            return Err(StoreError::Query(
                "oauth user requires a provider identity".to_string(),
            ));
        };

        // Reserve the identity first; a placeholder id marks the slot
        // until the user row exists
        let key = (provider, provider_id);
        match self.identities.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate(format!(
                    "provider identity already exists for {}",
                    new_user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(Uuid::nil());
            }
        }

        match self.insert_user(new_user) {
            Ok(user) => {
                self.identities.insert(key, user.id);
                Ok(user)
            }
            Err(e) => {
                // Roll back the reservation so the identity stays
                // claimable
                self.identities.remove(&key);
                Err(e)
            }
        }
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<ProfileRecord> {
        let mut profile = self
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound(format!("profile for user {}", user_id)))?;

        if let Some(display_name) = changes.display_name {
            profile.display_name = Some(display_name);
        }
        if let Some(ai_tools) = changes.ai_tools {
            profile.ai_tools = ai_tools;
        }
        if let Some(notifications) = changes.notifications {
            profile.notifications = notifications;
        }
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }

    async fn create_session(&self, new_session: NewSession) -> StoreResult<SessionRecord> {
        let session = SessionRecord {
            id: Uuid::new_v4(),
            user_id: new_session.user_id,
            access_token: new_session.access_token,
            refresh_token: new_session.refresh_token,
            device: new_session.device,
            expires_at: new_session.expires_at,
            created_at: Utc::now(),
        };
        self.sessions
            .insert(session.access_token.clone(), session.clone());
        Ok(session)
    }

    async fn delete_session_by_token(&self, access_token: &str) -> StoreResult<bool> {
        Ok(self.sessions.remove(access_token).is_some())
    }
}
