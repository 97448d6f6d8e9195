#![allow(dead_code)]
/// Shared fixtures for sso-service integration tests
use sso_service::db::MemoryCredentialStore;
use sso_service::models::App;
use sso_service::security::Argon2Hasher;
use sso_service::AuthService;
use std::sync::Arc;
use std::time::Duration;
use token_core::{TokenManager, TokenSecrets, TokenTtls};

pub const ACCESS_SECRET: &str = "it-access-secret";
pub const REFRESH_SECRET: &str = "it-refresh-secret";
pub const APP_NAME: &str = "app1";

pub struct Harness {
    pub store: Arc<MemoryCredentialStore>,
    pub auth: AuthService,
    pub tokens: TokenManager,
    pub app: App,
}

pub fn harness() -> Harness {
    harness_with_ttls(Duration::from_secs(900), Duration::from_secs(86_400))
}

/// Orchestrator over an in-memory store with one registered app
pub fn harness_with_ttls(access: Duration, refresh: Duration) -> Harness {
    let store = Arc::new(MemoryCredentialStore::new());
    let app = store.add_app(APP_NAME);

    let secrets = TokenSecrets::new(ACCESS_SECRET, REFRESH_SECRET).expect("test secrets");
    let tokens = TokenManager::new(secrets);
    let ttls = TokenTtls::new(access, refresh).expect("test ttls");

    let auth = AuthService::new(
        store.clone(),
        Arc::new(Argon2Hasher::new()),
        tokens.clone(),
        ttls,
    );

    Harness {
        store,
        auth,
        tokens,
        app,
    }
}
