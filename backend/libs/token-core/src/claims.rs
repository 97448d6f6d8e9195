//! Claim sets carried inside access and refresh tokens
//!
//! The two kinds are separate structs so a refresh payload can never be read
//! as an access payload. Refresh claims deliberately carry no email.
use crate::error::{Result, TokenError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which secret a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by both claim sets
pub trait TokenClaims: Serialize + DeserializeOwned {
    /// Secret this claim set is signed and verified with
    const KIND: TokenKind;

    fn subject(&self) -> &str;

    fn audience(&self) -> &str;

    /// Expiration time (Unix timestamp)
    fn expires_at(&self) -> i64;

    /// A token is unusable from its `exp` second onwards.
    fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at() <= now
    }
}

/// Access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email address; absent on access tokens minted by rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience (app ID)
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn subject(&self) -> &str {
        &self.sub
    }

    fn audience(&self) -> &str {
        &self.aud
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Refresh token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Audience (app ID)
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn subject(&self) -> &str {
        &self.sub
    }

    fn audience(&self) -> &str {
        &self.aud
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Access and refresh token minted together for one user/app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Longest accepted TTL (100 years)
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Lifetimes of the two token kinds
///
/// Both must be non-zero and at most [`MAX_TTL`], and the refresh lifetime
/// must cover the access lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    access: Duration,
    refresh: Duration,
    access_delta: chrono::Duration,
    refresh_delta: chrono::Duration,
}

impl TokenTtls {
    pub fn new(access: Duration, refresh: Duration) -> Result<Self> {
        if access.is_zero() || refresh.is_zero() {
            return Err(TokenError::InvalidTtl("TTLs must be non-zero".to_string()));
        }
        if refresh > MAX_TTL {
            return Err(TokenError::InvalidTtl(format!(
                "refresh TTL ({}s) exceeds the {}s limit",
                refresh.as_secs(),
                MAX_TTL.as_secs()
            )));
        }
        if refresh < access {
            return Err(TokenError::InvalidTtl(format!(
                "refresh TTL ({}s) is shorter than access TTL ({}s)",
                refresh.as_secs(),
                access.as_secs()
            )));
        }
        let to_delta = |ttl: Duration| {
            chrono::Duration::from_std(ttl)
                .map_err(|e| TokenError::InvalidTtl(format!("TTL out of range: {e}")))
        };

        Ok(Self {
            access,
            refresh,
            access_delta: to_delta(access)?,
            refresh_delta: to_delta(refresh)?,
        })
    }

    pub fn access(&self) -> Duration {
        self.access
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }

    pub(crate) fn access_delta(&self) -> chrono::Duration {
        self.access_delta
    }

    pub(crate) fn refresh_delta(&self) -> chrono::Duration {
        self.refresh_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttls_reject_refresh_shorter_than_access() {
        let result = TokenTtls::new(Duration::from_secs(600), Duration::from_secs(60));
        assert!(matches!(result, Err(TokenError::InvalidTtl(_))));
    }

    #[test]
    fn test_ttls_reject_zero() {
        assert!(TokenTtls::new(Duration::ZERO, Duration::from_secs(60)).is_err());
        assert!(TokenTtls::new(Duration::from_secs(60), Duration::ZERO).is_err());
    }

    #[test]
    fn test_ttls_reject_beyond_max() {
        let huge = Duration::from_secs(10_000_000_000_000);
        assert!(matches!(
            TokenTtls::new(huge, huge),
            Err(TokenError::InvalidTtl(_))
        ));
        assert!(TokenTtls::new(Duration::from_secs(60), MAX_TTL).is_ok());
        let over = MAX_TTL + Duration::from_secs(1);
        assert!(TokenTtls::new(Duration::from_secs(60), over).is_err());
    }

    #[test]
    fn test_ttls_allow_equal_lifetimes() {
        let ttls = TokenTtls::new(Duration::from_secs(60), Duration::from_secs(60)).unwrap();
        assert_eq!(ttls.access(), ttls.refresh());
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = RefreshClaims {
            sub: "u".into(),
            aud: "a".into(),
            iat: 100,
            exp: 200,
            jti: "j".into(),
        };
        assert!(!claims.is_expired_at(199));
        assert!(claims.is_expired_at(200));
    }

    #[test]
    fn test_rotated_access_claims_omit_email() {
        let claims = AccessClaims {
            sub: "u".into(),
            email: None,
            aud: "a".into(),
            iat: 1,
            exp: 2,
            jti: "j".into(),
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("email").is_none());
    }
}
