/// Input validation utilities for sso-service
use crate::error::{IdentityError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

// Hardcoded pattern, so a failure here is a source bug
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Reject an empty request field, naming it in the error
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(IdentityError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn require_email(email: &str) -> Result<()> {
    require("email", email)?;
    if !validate_email(email) {
        return Err(IdentityError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn parse_user_id(user_id: &str) -> Result<Uuid> {
    require("user_id", user_id)?;
    Uuid::parse_str(user_id)
        .map_err(|_| IdentityError::Validation("user_id must be a UUID".to_string()))
}
