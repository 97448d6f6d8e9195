/// PostgreSQL credential store
use super::{CredentialStore, StoreError};
use crate::models::{App, User};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<Uuid, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, pass_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, pass_hash, is_admin FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UserNotFound)
    }

    async fn is_admin(&self, user_id: Uuid) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::UserNotFound)
    }

    async fn find_app(&self, identifier: &str) -> Result<App, StoreError> {
        let id = Uuid::parse_str(identifier).ok();

        // An exact name match wins over an id match
        sqlx::query_as::<_, App>(
            r#"
            SELECT id, name FROM apps
            WHERE name = $1 OR id = $2
            ORDER BY (name = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::AppNotFound)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UserExists;
        }
    }
    StoreError::Database(err)
}
