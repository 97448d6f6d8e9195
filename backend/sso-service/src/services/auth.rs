//! Auth orchestrator: register, login, admin check and token pair refresh
//!
//! This is the only layer that turns store and token failures into
//! [`IdentityError`]. Anything that is not a domain outcome becomes
//! `IdentityError::Internal`, tagged with the operation that failed.
use crate::db::{CredentialStore, StoreError};
use crate::error::{IdentityError, Result};
use crate::security::PasswordHasher;
use once_cell::sync::OnceCell;
use std::fmt::Display;
use std::sync::Arc;
use token_core::{PairCheck, TokenError, TokenManager, TokenPair, TokenTtls};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Plaintext behind the decoy hash verified for unknown emails
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenManager,
    ttls: TokenTtls,
    /// Hashed once with `hasher` on the first unknown-email login
    decoy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenManager,
        ttls: TokenTtls,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            ttls,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn ttls(&self) -> &TokenTtls {
        &self.ttls
    }

    /// Verify credentials and mint a pair scoped to `app_id`
    ///
    /// An unknown email and a wrong password both surface as
    /// `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str, app_id: &str) -> Result<TokenPair> {
        const OP: &str = "auth.login";

        let user = match self.store.find_user_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::UserNotFound) => {
                warn!(op = OP, email = %email, "login for unknown email");
                // Pay for one verify so response time matches a wrong password
                self.verify_decoy(OP, password).await?;
                return Err(IdentityError::InvalidCredentials);
            }
            Err(err) => return Err(internal(OP, err)),
        };

        let hasher = Arc::clone(&self.hasher);
        let stored_hash = user.password_hash.clone();
        let candidate = password.to_owned();
        let matches = run_blocking(OP, move || hasher.verify(&stored_hash, &candidate)).await?;

        if !matches {
            warn!(op = OP, user_id = %user.id, "invalid password");
            return Err(IdentityError::InvalidCredentials);
        }

        let app = match self.store.find_app(app_id).await {
            Ok(app) => app,
            Err(StoreError::AppNotFound) => {
                warn!(op = OP, app_id = %app_id, "login for unknown app");
                return Err(IdentityError::InvalidAppId);
            }
            Err(err) => return Err(internal(OP, err)),
        };

        let pair = self
            .tokens
            .new_pair(
                &user.id.to_string(),
                Some(&user.email),
                &app.id.to_string(),
                &self.ttls,
            )
            .map_err(|err| internal(OP, err))?;

        info!(op = OP, user_id = %user.id, app_id = %app.id, "user logged in");
        Ok(pair)
    }

    async fn verify_decoy(&self, op: &'static str, password: &str) -> Result<()> {
        let hasher = Arc::clone(&self.hasher);
        let decoy_hash = Arc::clone(&self.decoy_hash);
        let candidate = password.to_owned();

        run_blocking(op, move || {
            let hash = decoy_hash.get_or_try_init(|| hasher.hash(DECOY_PASSWORD))?;
            hasher.verify(hash, &candidate).map(|_| ())
        })
        .await
    }

    /// Create a user and return its id
    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid> {
        const OP: &str = "auth.register";

        let hasher = Arc::clone(&self.hasher);
        let plaintext = password.to_owned();
        let password_hash = run_blocking(OP, move || hasher.hash(&plaintext)).await?;

        match self.store.save_user(email, &password_hash).await {
            Ok(user_id) => {
                info!(op = OP, user_id = %user_id, "user registered");
                Ok(user_id)
            }
            Err(StoreError::UserExists) => {
                warn!(op = OP, email = %email, "user already exists");
                Err(IdentityError::UserExists)
            }
            Err(err) => Err(internal(OP, err)),
        }
    }

    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool> {
        const OP: &str = "auth.is_admin";

        match self.store.is_admin(user_id).await {
            Ok(is_admin) => {
                info!(op = OP, user_id = %user_id, is_admin, "checked admin flag");
                Ok(is_admin)
            }
            Err(StoreError::UserNotFound) => {
                warn!(op = OP, user_id = %user_id, "user not found");
                Err(IdentityError::UserNotFound)
            }
            Err(err) => Err(internal(OP, err)),
        }
    }

    /// Validate a presented pair, rotating it when the access token is no
    /// longer usable
    ///
    /// Denial never says which of the two tokens failed.
    pub async fn check_and_refresh_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<PairCheck> {
        const OP: &str = "auth.check_and_refresh_tokens";

        match self.tokens.check_pair(access_token, refresh_token, &self.ttls) {
            Ok(check) => {
                if check.is_rotated() {
                    info!(op = OP, "token pair rotated");
                }
                Ok(check)
            }
            Err(TokenError::AccessDenied) => {
                info!(op = OP, "token pair denied");
                Err(IdentityError::AccessDenied)
            }
            Err(err) => Err(internal(OP, err)),
        }
    }
}

/// Run CPU-bound work off the async executor
async fn run_blocking<T, F>(op: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| internal(op, err))?
        .map_err(|err| internal(op, err))
}

fn internal(op: &str, err: impl Display) -> IdentityError {
    error!(op = op, error = %err, "internal failure");
    IdentityError::Internal(format!("{op}: {err}"))
}
