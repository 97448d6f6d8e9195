/// Data models for sso-service
use uuid::Uuid;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted Argon2id hash
    #[sqlx(rename = "pass_hash")]
    pub password_hash: String,
    pub is_admin: bool,
}

/// Application a token pair is scoped to
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct App {
    pub id: Uuid,
    pub name: String,
}
