/// Password hashing and verification using Argon2id
use crate::error::{IdentityError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// One-way password hashing with constant-time verification
///
/// Both operations are CPU-bound; async callers run them on the blocking pool.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string safe for storage
    fn hash(&self, password: &str) -> Result<String>;

    /// Check `password` against a stored hash
    ///
    /// `Ok(false)` on mismatch; `Err` only if the stored hash is unreadable or
    /// the engine fails.
    fn verify(&self, password_hash: &str, password: &str) -> Result<bool>;
}

/// Argon2id with the crate's default parameters
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    /// ## Security
    ///
    /// - Algorithm: Argon2id (default configuration)
    /// - Salt: Random salt generated per password
    /// - Output: PHC string
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    fn verify(&self, password_hash: &str, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| IdentityError::Internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(IdentityError::Internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
