//! Create user command
//!
//! The handler validates the credentials, hashes the password with argon2 and
//! inserts the user through the configured [`crate::db::UserStore`].

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, PasswordError};
use crate::db::DbError;
use crate::features::shared::validation::{
    validate_password, validate_username, CredentialValidationError,
};
use crate::features::FeatureState;
use crate::models::NewUser;

/// Command to create a new user
///
/// ```rust,ignore
/// let command = CreateUserCommand {
///     username: "admin".to_string(),
///     password: "admin".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    /// Unique login name
    pub username: String,

    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Response from creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a user
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(#[from] CredentialValidationError),

    #[error("User '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<CreateUserResponse, CreateUserError>> for CreateUserCommand {}

impl crate::cqrs::middleware::Command for CreateUserCommand {}

impl CreateUserCommand {
    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - Username must be 1-32 characters without whitespace
    /// - Password must be 5-128 characters
    pub fn validate(&self) -> Result<(), CreateUserError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

/// Handler function for creating users
#[tracing::instrument(skip(state, command), fields(username = %command.username))]
pub async fn handle(
    state: FeatureState,
    command: CreateUserCommand,
) -> Result<CreateUserResponse, CreateUserError> {
    command.validate()?;

    tracing::info!("Creating user");

    let password_hash = hash_password(&command.password)?;
    let record = state
        .users
        .create(NewUser {
            username: command.username.clone(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DbError::Duplicate(_) => CreateUserError::DuplicateUsername(command.username.clone()),
            other => CreateUserError::Database(other),
        })?;

    tracing::info!(user_id = record.id, "User created");

    Ok(CreateUserResponse {
        id: record.id,
        username: record.username,
        created_at: record.created_at,
    })
}
