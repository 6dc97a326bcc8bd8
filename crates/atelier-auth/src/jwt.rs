//! Hand-rolled JWT codec (HS256 only)
//!
//! Compact JWS serialization: `base64url(header).base64url(payload).signature`.
//! The codec is a pure encode/decode pair over its arguments. It never
//! reads configuration or ambient state.
//!
//! The algorithm is fixed to HS256. Verification recomputes the HMAC
//! and never branches on the header's `alg` field, which removes the
//! classic `alg:none` / algorithm-confusion surface outright. That
//! small, auditable trust boundary is why this is not a full JOSE
//! library dependency.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use atelier_store::UserRole;

use crate::crypto::{b64url_decode, b64url_encode, hmac_sha256};
use crate::error::{AuthError, AuthResult};
use crate::expiry::parse_expiry;

/// Serialized byte-for-byte as the first token segment
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Caller-supplied claims; `iat`/`exp` are added at issue time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Additional claims pass through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenPayload {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            extra: Map::new(),
        }
    }
}

/// Decoded payload of a verified token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds; strictly greater than `iat`
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sign a token: merge `iat`/`exp` into the payload, HMAC-SHA256 the
/// signing input, return the three-part compact form.
pub fn issue(payload: &TokenPayload, secret: &str, expires_in: &str) -> AuthResult<String> {
    let iat = Utc::now().timestamp();
    let exp = iat + (parse_expiry(expires_in)? / 1000) as i64;

    let mut claims = serde_json::to_value(payload)
        .map_err(|e| AuthError::Internal(format!("claims serialization failed: {}", e)))?;
    let map = claims
        .as_object_mut()
        .ok_or_else(|| AuthError::Internal("claims did not serialize to an object".to_string()))?;
    map.insert("iat".to_string(), Value::from(iat));
    map.insert("exp".to_string(), Value::from(exp));

    let payload_json = serde_json::to_string(&claims)
        .map_err(|e| AuthError::Internal(format!("claims serialization failed: {}", e)))?;

    let signing_input = format!("{}.{}", b64url_encode(HEADER), b64url_encode(&payload_json));
    let signature = b64url_encode(hmac_sha256(secret.as_bytes(), signing_input.as_bytes()));

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verify a token's signature and expiry, returning the decoded
/// payload. Every failure mode (wrong part count, decode failure,
/// signature mismatch, expired) is the same [`AuthError::InvalidToken`].
pub fn verify(token: &str, secret: &str) -> AuthResult<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = parts.as_slice() else {
        return Err(AuthError::InvalidToken);
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    // Recompute over the received segments; the header's contents,
    // including its alg, are deliberately not consulted
    let signing_input = format!("{}.{}", header, payload);
    let expected = b64url_encode(hmac_sha256(secret.as_bytes(), signing_input.as_bytes()));

    let matches: bool = expected
        .as_bytes()
        .ct_eq(signature.as_bytes())
        .into();
    if !matches {
        return Err(AuthError::InvalidToken);
    }

    // `exp` and `iat` are mandatory in this wire shape: a signed
    // payload missing either fails deserialization and is rejected
    let payload_bytes = b64url_decode(payload)?;
    let claims: Claims =
        serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::InvalidToken)?;

    // No leeway: a token is valid only while exp is strictly in the
    // future at verification time
    if claims.exp <= Utc::now().timestamp() {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-tokens-min-32-bytes!";

    fn payload() -> TokenPayload {
        TokenPayload::new(Uuid::new_v4(), "alice@example.com", UserRole::Member)
    }

    #[test]
    fn test_round_trip() {
        let payload = payload();
        let token = issue(&payload, SECRET, "15m").unwrap();

        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, payload.user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Member);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_extra_claims_pass_through() {
        let mut payload = payload();
        payload
            .extra
            .insert("workspaceId".to_string(), Value::from("ws-42"));

        let token = issue(&payload, SECRET, "1h").unwrap();
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.extra.get("workspaceId"), Some(&Value::from("ws-42")));
    }

    #[test]
    fn test_header_segment_is_canonical() {
        let token = issue(&payload(), SECRET, "15m").unwrap();
        let header = token.split('.').next().unwrap();
        assert_eq!(
            b64url_decode(header).unwrap(),
            br#"{"alg":"HS256","typ":"JWT"}"#
        );
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = issue(&payload(), SECRET, "15m").unwrap();
        let dot = token.rfind('.').unwrap();

        // Flip one character at a time across the signature segment
        for i in dot + 1..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(verify(&tampered, SECRET).is_err(), "flip at {} accepted", i);
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue(&payload(), SECRET, "15m").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = b64url_encode(
            r#"{"userId":"00000000-0000-0000-0000-000000000000","email":"mallory@example.com","role":"admin","iat":0,"exp":99999999999}"#,
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(verify(&forged, SECRET).is_err());
    }

    #[test]
    fn test_secret_isolation() {
        let token = issue(&payload(), SECRET, "15m").unwrap();
        let other = "another-perfectly-valid-32-char-secret!!";
        assert!(verify(&token, other).is_err());
    }

    #[test]
    fn test_wrong_part_count_rejected() {
        assert!(verify("", SECRET).is_err());
        assert!(verify("only-one-part", SECRET).is_err());
        assert!(verify("two.parts", SECRET).is_err());
        assert!(verify("fo.ur.pa.rts", SECRET).is_err());

        let token = issue(&payload(), SECRET, "15m").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert!(verify(&format!(".{}.{}", parts[1], parts[2]), SECRET).is_err());
        assert!(verify(&format!("{}.{}.", parts[0], parts[1]), SECRET).is_err());
    }

    #[test]
    fn test_alg_header_is_ignored() {
        // A forged token claiming alg:none still has to carry a valid
        // HMAC: verification never branches on the header
        let header = b64url_encode(r#"{"alg":"none","typ":"JWT"}"#);
        let body = b64url_encode(r#"{"userId":"00000000-0000-0000-0000-000000000000","email":"x@x.com","role":"member","iat":0,"exp":99999999999}"#);
        let forged = format!("{}.{}.", header, body);
        assert!(verify(&forged, SECRET).is_err());

        let forged_with_sig = format!("{}.{}.{}", header, body, b64url_encode("fake"));
        assert!(verify(&forged_with_sig, SECRET).is_err());
    }

    #[test]
    fn test_missing_exp_rejected() {
        // Sign a payload omitting exp with the real secret; a correct
        // signature must not rescue an incomplete claim set
        let body = format!(
            r#"{{"userId":"{}","email":"x@x.com","role":"member","iat":0}}"#,
            Uuid::new_v4()
        );
        let signing_input = format!("{}.{}", b64url_encode(HEADER), b64url_encode(&body));
        let signature = b64url_encode(hmac_sha256(SECRET.as_bytes(), signing_input.as_bytes()));
        let token = format!("{}.{}", signing_input, signature);

        assert!(matches!(
            verify(&token, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expiry_enforced() {
        let token = issue(&payload(), SECRET, "1s").unwrap();

        // Valid immediately after issuance
        assert!(verify(&token, SECRET).is_ok());

        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(verify(&token, SECRET).is_err());
    }

    #[test]
    fn test_bad_expiry_spec_is_config_error() {
        let result = issue(&payload(), SECRET, "soon");
        assert!(matches!(result, Err(AuthError::Config(_))));
    }
}
