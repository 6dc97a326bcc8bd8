//! Public-facing auth types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_store::{UserRecord, UserRole};

/// User shape safe to hand to route handlers and clients.
///
/// Built by an exhaustive field-by-field projection from
/// [`UserRecord`], never a wildcard copy, so a new sensitive store
/// field cannot leak without someone adding it here on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub oauth_provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PublicUser {
    /// Project a store record to the public shape. The password hash
    /// and provider-scoped id stay behind.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            role: record.role,
            oauth_provider: record.oauth_provider.clone(),
            created_at: record.created_at,
        }
    }
}

/// What a successful register/login/OAuth-login hands back
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: PublicUser,
    /// The signed JWT
    pub token: String,
    /// Opaque random refresh token
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_drops_credentials() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            password_hash: Some("$argon2id$very-secret".to_string()),
            role: UserRole::Member,
            oauth_provider: None,
            oauth_provider_id: Some("provider-scoped-id".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = PublicUser::from_record(&record);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("provider-scoped-id"));
        assert!(json.contains("alice@example.com"));
    }
}
