//! Token pair lifecycle: minting and validate-and-rotate
//!
//! ## Rotation table
//!
//! | Access token                   | Refresh token   | Outcome              |
//! |--------------------------------|-----------------|----------------------|
//! | valid, live, same `(sub, aud)` | valid, live     | `Valid` (unchanged)  |
//! | expired/invalid/foreign        | valid, live     | `Rotated` (new pair) |
//! | any                            | expired/invalid | `AccessDenied`       |
//!
//! A rotated pair takes its identity from the refresh token only. Nothing is
//! persisted; every call is decided from the two tokens and the clock.
use crate::claims::{AccessClaims, RefreshClaims, TokenClaims, TokenPair, TokenTtls};
use crate::codec::TokenCodec;
use crate::error::{Result, TokenError};
use crate::secrets::SecretResolver;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Result of a successful pair check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairCheck {
    /// Both tokens are live; the presented pair is returned as-is
    Valid(TokenPair),
    /// The access token was unusable; a fresh pair was minted
    Rotated(TokenPair),
}

impl PairCheck {
    pub fn pair(&self) -> &TokenPair {
        match self {
            PairCheck::Valid(pair) | PairCheck::Rotated(pair) => pair,
        }
    }

    pub fn into_pair(self) -> TokenPair {
        match self {
            PairCheck::Valid(pair) | PairCheck::Rotated(pair) => pair,
        }
    }

    pub fn is_rotated(&self) -> bool {
        matches!(self, PairCheck::Rotated(_))
    }
}

/// Mints and checks access/refresh pairs
#[derive(Clone)]
pub struct TokenManager {
    codec: TokenCodec,
}

impl TokenManager {
    pub fn new(secrets: impl SecretResolver + 'static) -> Self {
        Self {
            codec: TokenCodec::new(secrets),
        }
    }

    pub fn from_shared(secrets: Arc<dyn SecretResolver>) -> Self {
        Self {
            codec: TokenCodec::from_shared(secrets),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Mint a pair for `user_id` scoped to `app_id`
    pub fn new_pair(
        &self,
        user_id: &str,
        email: Option<&str>,
        app_id: &str,
        ttls: &TokenTtls,
    ) -> Result<TokenPair> {
        self.new_pair_at(user_id, email, app_id, ttls, Utc::now())
    }

    /// Mint a pair as of `now`
    pub fn new_pair_at(
        &self,
        user_id: &str,
        email: Option<&str>,
        app_id: &str,
        ttls: &TokenTtls,
        now: DateTime<Utc>,
    ) -> Result<TokenPair> {
        let access = AccessClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            aud: app_id.to_string(),
            iat: now.timestamp(),
            exp: expiry(now, ttls.access_delta())?,
            jti: Uuid::new_v4().to_string(),
        };
        let refresh = RefreshClaims {
            sub: user_id.to_string(),
            aud: app_id.to_string(),
            iat: now.timestamp(),
            exp: expiry(now, ttls.refresh_delta())?,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(TokenPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
        })
    }

    /// Decide whether a presented pair is still authenticated, rotating it
    /// when the access token can no longer be used
    ///
    /// ## Errors
    ///
    /// - `TokenError::AccessDenied` if the refresh token is expired, malformed,
    ///   or not signed with the refresh secret
    /// - `TokenError::Encoding` / `TokenError::SecretUnavailable` on our own
    ///   misconfiguration
    pub fn check_pair(
        &self,
        access_token: &str,
        refresh_token: &str,
        ttls: &TokenTtls,
    ) -> Result<PairCheck> {
        self.check_pair_at(access_token, refresh_token, ttls, Utc::now())
    }

    /// [`check_pair`](Self::check_pair) as of `now`
    pub fn check_pair_at(
        &self,
        access_token: &str,
        refresh_token: &str,
        ttls: &TokenTtls,
        now: DateTime<Utc>,
    ) -> Result<PairCheck> {
        let now_ts = now.timestamp();

        let refresh = match self.codec.decode::<RefreshClaims>(refresh_token) {
            Ok(claims) => claims,
            Err(err) if err.is_untrusted_token() => {
                debug!(error = %err, "refresh token rejected");
                return Err(TokenError::AccessDenied);
            }
            Err(err) => return Err(err),
        };

        if refresh.is_expired_at(now_ts) {
            debug!(sub = %refresh.sub, exp = refresh.exp, "refresh token expired");
            return Err(TokenError::AccessDenied);
        }

        let access_usable = match self.codec.decode::<AccessClaims>(access_token) {
            Ok(access) => {
                !access.is_expired_at(now_ts)
                    && access.sub == refresh.sub
                    && access.aud == refresh.aud
            }
            Err(err) if err.is_untrusted_token() => {
                debug!(error = %err, "access token rejected, rotating");
                false
            }
            Err(err) => return Err(err),
        };

        if access_usable {
            return Ok(PairCheck::Valid(TokenPair {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
            }));
        }

        let pair = self.new_pair_at(refresh.subject(), None, refresh.audience(), ttls, now)?;
        debug!(sub = %refresh.sub, aud = %refresh.aud, "token pair rotated");

        Ok(PairCheck::Rotated(pair))
    }
}

fn expiry(now: DateTime<Utc>, ttl: chrono::Duration) -> Result<i64> {
    now.checked_add_signed(ttl)
        .map(|exp| exp.timestamp())
        .ok_or_else(|| TokenError::InvalidTtl(format!("expiry overflows at {now}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::MAX_TTL;
    use crate::secrets::TokenSecrets;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn manager() -> TokenManager {
        TokenManager::new(TokenSecrets::new("access-secret", "refresh-secret").unwrap())
    }

    fn ttls() -> TokenTtls {
        TokenTtls::new(Duration::from_secs(60), Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn test_new_pair_expiries() {
        let manager = manager();
        let now = Utc::now();
        let pair = manager
            .new_pair_at("user-1", Some("a@x.com"), "app-1", &ttls(), now)
            .unwrap();

        let access: AccessClaims = manager.codec().decode(&pair.access_token).unwrap();
        let refresh: RefreshClaims = manager.codec().decode(&pair.refresh_token).unwrap();

        assert_eq!(access.exp, now.timestamp() + 60);
        assert_eq!(refresh.exp, now.timestamp() + 3600);
        assert_eq!(access.iat, refresh.iat);
        assert_ne!(access.jti, refresh.jti);
        assert_eq!(access.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_live_pair_is_returned_unchanged() {
        let manager = manager();
        let now = Utc::now();
        let pair = manager
            .new_pair_at("user-1", Some("a@x.com"), "app-1", &ttls(), now)
            .unwrap();

        let check = manager
            .check_pair_at(&pair.access_token, &pair.refresh_token, &ttls(), now)
            .unwrap();

        assert_eq!(check, PairCheck::Valid(pair));
    }

    #[test]
    fn test_foreign_access_token_forces_rotation() {
        let manager = manager();
        let now = Utc::now();
        let mine = manager
            .new_pair_at("user-1", Some("a@x.com"), "app-1", &ttls(), now)
            .unwrap();
        let theirs = manager
            .new_pair_at("user-2", Some("b@x.com"), "app-1", &ttls(), now)
            .unwrap();

        let check = manager
            .check_pair_at(&theirs.access_token, &mine.refresh_token, &ttls(), now)
            .unwrap();

        assert!(check.is_rotated());
        let access: AccessClaims = manager.codec().decode(&check.pair().access_token).unwrap();
        assert_eq!(access.sub, "user-1");
    }

    #[test]
    fn test_mint_near_end_of_time_is_error_not_panic() {
        let manager = manager();
        let ttls = TokenTtls::new(Duration::from_secs(60), MAX_TTL).unwrap();

        let result = manager.new_pair_at("user-1", None, "app-1", &ttls, DateTime::<Utc>::MAX_UTC);

        assert!(matches!(result, Err(TokenError::InvalidTtl(_))));
    }

    #[test]
    fn test_refresh_expiry_boundary_denies() {
        let manager = manager();
        let minted = Utc::now();
        let pair = manager
            .new_pair_at("user-1", None, "app-1", &ttls(), minted)
            .unwrap();

        let at_expiry = minted + ChronoDuration::seconds(3600);
        let result =
            manager.check_pair_at(&pair.access_token, &pair.refresh_token, &ttls(), at_expiry);

        assert!(matches!(result, Err(TokenError::AccessDenied)));
    }
}
