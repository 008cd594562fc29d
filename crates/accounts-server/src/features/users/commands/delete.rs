use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error("User {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<DeleteUserResponse, DeleteUserError>> for DeleteUserCommand {}

impl crate::cqrs::middleware::Command for DeleteUserCommand {}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    command: DeleteUserCommand,
) -> Result<DeleteUserResponse, DeleteUserError> {
    if !state.users.delete(command.id).await? {
        return Err(DeleteUserError::NotFound(command.id));
    }

    Ok(DeleteUserResponse {
        id: command.id,
        deleted: true,
    })
}
