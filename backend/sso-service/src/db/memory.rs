/// In-memory credential store
///
/// Email uniqueness is decided under the email map's entry lock, so
/// concurrent registrations of one address produce exactly one user.
use super::{CredentialStore, StoreError};
use crate::models::{App, User};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    apps: DashMap<Uuid, App>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an app and return it
    pub fn add_app(&self, name: &str) -> App {
        let app = App {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.apps.insert(app.id, app.clone());
        app
    }

    /// Set the admin flag; returns false for an unknown user
    pub fn set_admin(&self, user_id: Uuid, is_admin: bool) -> bool {
        match self.users.get_mut(&user_id) {
            Some(mut user) => {
                user.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<Uuid, StoreError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StoreError::UserExists),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    is_admin: false,
                };
                let id = user.id;
                self.users.insert(id, user);
                slot.insert(id);
                Ok(id)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let id = self
            .emails
            .get(email)
            .map(|entry| *entry.value())
            .ok_or(StoreError::UserNotFound)?;

        self.users
            .get(&id)
            .map(|user| user.value().clone())
            .ok_or(StoreError::UserNotFound)
    }

    async fn is_admin(&self, user_id: Uuid) -> Result<bool, StoreError> {
        self.users
            .get(&user_id)
            .map(|user| user.is_admin)
            .ok_or(StoreError::UserNotFound)
    }

    async fn find_app(&self, identifier: &str) -> Result<App, StoreError> {
        if let Some(app) = self.apps.iter().find(|app| app.name == identifier) {
            return Ok(app.value().clone());
        }

        Uuid::parse_str(identifier)
            .ok()
            .and_then(|id| self.apps.get(&id).map(|app| app.value().clone()))
            .ok_or(StoreError::AppNotFound)
    }
}
