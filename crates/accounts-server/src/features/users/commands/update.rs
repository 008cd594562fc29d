//! Update user command

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, PasswordError};
use crate::db::DbError;
use crate::features::shared::validation::{
    validate_password, validate_username, CredentialValidationError,
};
use crate::features::FeatureState;
use crate::models::UserChanges;

/// Replace a user's username and password
///
/// `id` comes from the request path, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    #[serde(default, skip_deserializing)]
    pub id: i64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub id: i64,
    pub username: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error("{0}")]
    Validation(#[from] CredentialValidationError),

    #[error("User {0} not found")]
    NotFound(i64),

    #[error("User '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<UpdateUserResponse, UpdateUserError>> for UpdateUserCommand {}

impl crate::cqrs::middleware::Command for UpdateUserCommand {}

impl UpdateUserCommand {
    pub fn validate(&self) -> Result<(), UpdateUserError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(state, command),
    fields(user_id = command.id, username = %command.username)
)]
pub async fn handle(
    state: FeatureState,
    command: UpdateUserCommand,
) -> Result<UpdateUserResponse, UpdateUserError> {
    command.validate()?;

    let changes = UserChanges {
        username: command.username.clone(),
        password_hash: hash_password(&command.password)?,
    };

    let record = state
        .users
        .update(command.id, changes)
        .await
        .map_err(|e| match e {
            DbError::Duplicate(_) => UpdateUserError::DuplicateUsername(command.username.clone()),
            other => UpdateUserError::Database(other),
        })?
        .ok_or(UpdateUserError::NotFound(command.id))?;

    tracing::info!("User updated");

    Ok(UpdateUserResponse {
        id: record.id,
        username: record.username,
        updated_at: record.updated_at,
    })
}
