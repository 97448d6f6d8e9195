use crate::claims::TokenKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("{0} token secret is not configured")]
    SecretUnavailable(TokenKind),

    #[error("Access and refresh tokens must use different secrets")]
    IdenticalSecrets,

    #[error("Access denied")]
    AccessDenied,

    #[error("Invalid token TTL: {0}")]
    InvalidTtl(String),
}

impl TokenError {
    /// True for failures that mean "this token cannot be trusted", as opposed to
    /// configuration or signing problems on our side.
    pub fn is_untrusted_token(&self) -> bool {
        matches!(self, TokenError::InvalidSignature | TokenError::Malformed(_))
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            // A different HMAC variant cannot verify under our key either
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
