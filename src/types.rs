//! Type definitions for authentication

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Authentication tokens (access + refresh)
///
/// Serialized exactly as the login endpoint returns them:
/// `{"access": "...", "refresh": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

impl AuthTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Both halves of the pair are present
    pub fn is_complete(&self) -> bool {
        !self.access.trim().is_empty() && !self.refresh.trim().is_empty()
    }

    /// Same pair with a new access token
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: self.refresh.clone(),
        }
    }

    /// Decode the claims carried by the access token
    pub fn access_claims(&self) -> Result<AccessClaims> {
        AccessClaims::decode(&self.access)
    }
}

/// Payload of a JWT access token.
///
/// The signature is NOT verified; the backend remains the authority. The
/// claims are only used to show who is signed in and when the token lapses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expiry, seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
}

impl AccessClaims {
    pub fn decode(token: &str) -> Result<Self> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| ClientError::InvalidResponse("Access token is not a JWT".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ClientError::InvalidResponse(format!("Invalid JWT payload encoding: {e}")))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check if the token has expired at `now` (seconds since epoch).
    /// Tokens without an `exp` claim never expire client-side.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| now >= exp)
    }
}

/// Gender as the backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(ClientError::Validation(format!("Unknown gender {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_tokens_wire_format() {
        let tokens: AuthTokens = serde_json::from_str(r#"{"refresh": "r1", "access": "a1"}"#).unwrap();
        assert_eq!(tokens, AuthTokens::new("a1", "r1"));
        assert!(tokens.is_complete());
        assert!(!AuthTokens::new("a1", " ").is_complete());
    }

    #[test]
    fn test_with_access_keeps_refresh() {
        let tokens = AuthTokens::new("old", "refresh").with_access("new");
        assert_eq!(tokens.access, "new");
        assert_eq!(tokens.refresh, "refresh");
    }

    #[test]
    fn test_decode_claims() {
        let token = jwt(r#"{"token_type":"access","exp":1700000900,"iat":1700000000,"jti":"abc","user_id":42}"#);
        let claims = AccessClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id, Some(42));
        assert_eq!(claims.token_type.as_deref(), Some("access"));
        assert!(!claims.is_expired_at(1700000000));
        assert!(claims.is_expired_at(1700000900));
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" Male ".parse::<Gender>().unwrap(), Gender::Male);
        assert!("unknown".parse::<Gender>().is_err());
        assert_eq!(serde_json::to_string(&Gender::Other).unwrap(), r#""Other""#);
    }

    #[test]
    fn test_decode_rejects_opaque_token() {
        assert!(AccessClaims::decode("not-a-jwt").is_err());
        assert!(AccessClaims::decode("a.%%%.c").is_err());
    }
}
