use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Public failure taxonomy of the auth service
///
/// Store and token errors are translated into these kinds by the
/// orchestrator; nothing below it leaks to callers.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid app id")]
    InvalidAppId,

    #[error("Access denied")]
    AccessDenied,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            IdentityError::InvalidCredentials => {
                Status::new(Code::InvalidArgument, "Invalid email or password")
            }
            IdentityError::UserExists => Status::new(Code::AlreadyExists, "User already exists"),
            IdentityError::UserNotFound => Status::new(Code::NotFound, "User not found"),
            IdentityError::InvalidAppId => Status::new(Code::InvalidArgument, "Invalid app id"),
            IdentityError::AccessDenied => Status::new(Code::PermissionDenied, "Access denied"),
            IdentityError::Validation(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            IdentityError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

// gRPC Status conversion
impl From<IdentityError> for Status {
    fn from(err: IdentityError) -> Self {
        err.to_status()
    }
}
