//! Per-kind signing secrets
//!
//! Secrets are resolved once by the embedding service (environment, `.env`,
//! a secrets manager) and handed to the codec through [`SecretResolver`]. The
//! codec itself never reads configuration.
use crate::claims::TokenKind;
use crate::error::{Result, TokenError};
use std::fmt;

/// Supplies the HMAC secret for a token kind
pub trait SecretResolver: Send + Sync {
    fn secret(&self, kind: TokenKind) -> Result<&[u8]>;
}

/// Fixed access/refresh secret pair
#[derive(Clone)]
pub struct TokenSecrets {
    access: Vec<u8>,
    refresh: Vec<u8>,
}

impl TokenSecrets {
    /// Build a secret pair. Both secrets must be non-empty and distinct so a
    /// token of one kind never verifies as the other.
    pub fn new(access: impl Into<Vec<u8>>, refresh: impl Into<Vec<u8>>) -> Result<Self> {
        let access = access.into();
        let refresh = refresh.into();

        if access.is_empty() {
            return Err(TokenError::SecretUnavailable(TokenKind::Access));
        }
        if refresh.is_empty() {
            return Err(TokenError::SecretUnavailable(TokenKind::Refresh));
        }
        if access == refresh {
            return Err(TokenError::IdenticalSecrets);
        }

        Ok(Self { access, refresh })
    }
}

impl SecretResolver for TokenSecrets {
    fn secret(&self, kind: TokenKind) -> Result<&[u8]> {
        Ok(match kind {
            TokenKind::Access => self.access.as_slice(),
            TokenKind::Refresh => self.refresh.as_slice(),
        })
    }
}

impl fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecrets")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_secrets() {
        assert!(matches!(
            TokenSecrets::new("", "refresh"),
            Err(TokenError::SecretUnavailable(TokenKind::Access))
        ));
        assert!(matches!(
            TokenSecrets::new("access", ""),
            Err(TokenError::SecretUnavailable(TokenKind::Refresh))
        ));
    }

    #[test]
    fn test_rejects_shared_secret() {
        assert!(matches!(
            TokenSecrets::new("same", "same"),
            Err(TokenError::IdenticalSecrets)
        ));
    }

    #[test]
    fn test_resolves_by_kind() {
        let secrets = TokenSecrets::new("a-secret", "r-secret").unwrap();
        assert_eq!(secrets.secret(TokenKind::Access).unwrap(), b"a-secret");
        assert_eq!(secrets.secret(TokenKind::Refresh).unwrap(), b"r-secret");
    }

    #[test]
    fn test_debug_redacts() {
        let secrets = TokenSecrets::new("a-secret", "r-secret").unwrap();
        let rendered = format!("{secrets:?}");
        assert!(!rendered.contains("a-secret"));
        assert!(!rendered.contains("r-secret"));
    }
}
