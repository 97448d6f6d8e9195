/// Business logic layer for sso-service
pub mod auth;

pub use auth::AuthService;
