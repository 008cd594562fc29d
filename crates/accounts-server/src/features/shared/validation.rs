//! Shared validation utilities
//!
//! ```rust,ignore
//! validate_username(&command.username)?;
//! validate_password(&command.password)?;
//! ```

use thiserror::Error;

pub const USERNAME_MAX_LENGTH: usize = 32;
pub const PASSWORD_MIN_LENGTH: usize = 5;
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Errors raised by credential validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    #[error("Username is required and cannot be empty")]
    UsernameRequired,

    #[error("Username must be between 1 and {max_length} characters")]
    UsernameTooLong { max_length: usize },

    #[error("Username cannot contain whitespace")]
    UsernameWhitespace,

    #[error("Password must be between {min_length} and {max_length} characters")]
    PasswordLength {
        min_length: usize,
        max_length: usize,
    },
}

/// Validate a username
///
/// # Rules
/// - Must not be empty
/// - Must not exceed 32 characters
/// - Must not contain whitespace
pub fn validate_username(username: &str) -> Result<(), CredentialValidationError> {
    if username.is_empty() {
        return Err(CredentialValidationError::UsernameRequired);
    }

    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(CredentialValidationError::UsernameTooLong {
            max_length: USERNAME_MAX_LENGTH,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(CredentialValidationError::UsernameWhitespace);
    }

    Ok(())
}

/// Validate a plain-text password before hashing
pub fn validate_password(password: &str) -> Result<(), CredentialValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len) {
        return Err(CredentialValidationError::PasswordLength {
            min_length: PASSWORD_MIN_LENGTH,
            max_length: PASSWORD_MAX_LENGTH,
        });
    }
    Ok(())
}
