/// Security utilities for sso-service
pub mod password;

pub use password::{Argon2Hasher, PasswordHasher};
