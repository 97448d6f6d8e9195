/// Credential storage for sso-service
///
/// - `postgres`: sqlx-backed store used by the service binary
/// - `memory`: DashMap-backed store for tests and local runs
pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use crate::models::{App, User};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Users and apps, as the auth orchestrator needs them
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user and return its id; a taken email is `StoreError::UserExists`
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<Uuid, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn is_admin(&self, user_id: Uuid) -> Result<bool, StoreError>;

    /// Look up an app by name, or by id when `identifier` is a UUID
    async fn find_app(&self, identifier: &str) -> Result<App, StoreError>;
}
