//! Store record shapes
//!
//! Plain structured data exchanged with the auth layer. No
//! ORM-specific semantics leak upward: the auth service only ever sees
//! these records and the [`crate::AuthStore`] trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles within a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular workspace member
    #[default]
    Member,
    /// Workspace administrator
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Credential record as persisted by the store.
///
/// A sign-in-capable account has a password hash, an OAuth provider
/// identity, or both (password added after OAuth signup; the store's
/// responsibility, not enforced here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    /// Absent for OAuth-only accounts
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub oauth_provider: Option<String>,
    pub oauth_provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workspace profile row created alongside every user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    /// AI tools the member selected during onboarding
    pub ai_tools: Vec<String>,
    /// Notification preferences, schema owned by the route layer
    pub notifications: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Empty profile for a freshly registered user
    pub fn empty(user_id: Uuid, display_name: Option<String>) -> Self {
        Self {
            user_id,
            display_name,
            ai_tools: Vec::new(),
            notifications: serde_json::Value::Null,
            updated_at: Utc::now(),
        }
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub ai_tools: Option<Vec<String>>,
    pub notifications: Option<serde_json::Value>,
}

/// Session row, one per successful login (multi-device)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The JWT as issued; stored for revocation lookup
    pub access_token: String,
    /// Opaque random string, distinct identity from the JWT
    pub refresh_token: String,
    pub device: Option<String>,
    /// Kept independently from the JWT's own `exp` claim
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user together with its profile row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub oauth_provider: Option<String>,
    pub oauth_provider_id: Option<String>,
    pub display_name: Option<String>,
}

/// Input for creating a session row
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub device: Option<String>,
    pub expires_at: DateTime<Utc>,
}
