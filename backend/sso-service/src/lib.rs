/// SSO Service Library
///
/// Registers users, verifies credentials and issues access/refresh token
/// pairs scoped to an application.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Credential stores (PostgreSQL, in-memory)
/// - `error`: Error types
/// - `grpc`: gRPC server implementation
/// - `http`: Health and metrics endpoints
/// - `metrics`: Prometheus counters
/// - `models`: Data models
/// - `security`: Password hashing
/// - `services`: Auth orchestration
/// - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod http;
pub mod metrics;
pub mod models;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use grpc::AuthGrpcService;
pub use services::AuthService;
