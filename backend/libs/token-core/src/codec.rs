//! Signed claim set encoding (HS256)
//!
//! Decoding verifies the signature and the token structure only. Expired
//! tokens decode successfully so callers can tell "tampered" apart from
//! "merely expired"; expiry is checked with [`TokenClaims::is_expired_at`].
use crate::claims::TokenClaims;
use crate::error::{Result, TokenError};
use crate::secrets::SecretResolver;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Every token kind is HMAC-SHA256 signed
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Sign `claims` with `secret`
///
/// ## Errors
///
/// `TokenError::Encoding` if the secret is empty or serialization/signing fails.
pub fn encode_claims<C: Serialize>(claims: &C, secret: &[u8]) -> Result<String> {
    if secret.is_empty() {
        return Err(TokenError::Encoding("signing secret is empty".to_string()));
    }

    encode(
        &Header::new(JWT_ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verify `token` under `secret` and return its claims, expired or not
///
/// ## Errors
///
/// - `TokenError::InvalidSignature` if the signature does not verify
/// - `TokenError::Malformed` if the token is not a well-formed signed claim set
pub fn decode_claims<C: DeserializeOwned>(token: &str, secret: &[u8]) -> Result<C> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = false;
    // `aud` is an opaque app id here, not a value we pin per deployment
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "sub", "aud"]);

    let data = decode::<C>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}

/// Codec bound to a secret resolver; the claim type selects the secret
#[derive(Clone)]
pub struct TokenCodec {
    secrets: Arc<dyn SecretResolver>,
}

impl TokenCodec {
    pub fn new(secrets: impl SecretResolver + 'static) -> Self {
        Self {
            secrets: Arc::new(secrets),
        }
    }

    pub fn from_shared(secrets: Arc<dyn SecretResolver>) -> Self {
        Self { secrets }
    }

    pub fn encode<C: TokenClaims>(&self, claims: &C) -> Result<String> {
        let secret = self
            .secrets
            .secret(C::KIND)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        encode_claims(claims, secret)
    }

    pub fn decode<C: TokenClaims>(&self, token: &str) -> Result<C> {
        let secret = self.secrets.secret(C::KIND)?;
        decode_claims(token, secret)
    }
}
