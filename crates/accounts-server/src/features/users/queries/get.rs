use accounts_common::format_display;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserQuery {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetUserResponse {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error("Username is required and cannot be empty")]
    UsernameRequired,
    #[error("User '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<GetUserResponse, GetUserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

impl GetUserQuery {
    pub fn validate(&self) -> Result<(), GetUserError> {
        if self.username.is_empty() {
            return Err(GetUserError::UsernameRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: GetUserQuery,
) -> Result<GetUserResponse, GetUserError> {
    query.validate()?;

    let record = state
        .users
        .get_by_username(&query.username)
        .await?
        .ok_or_else(|| GetUserError::NotFound(query.username.clone()))?;

    Ok(GetUserResponse {
        id: record.id,
        created_at: format_display(&record.created_at),
        updated_at: format_display(&record.updated_at),
        username: record.username,
        password: record.password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{memory_state, seed_user};

    #[tokio::test]
    async fn test_handle_found() {
        let state = memory_state();
        let user = seed_user(&state, "admin", "admin").await;

        let response = handle(
            state,
            GetUserQuery {
                username: "admin".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.id, user.id);
        assert_eq!(response.created_at, format_display(&user.created_at));
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let result = handle(
            memory_state(),
            GetUserQuery {
                username: "nobody".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(GetUserError::NotFound(name)) if name == "nobody"));
    }

    #[test]
    fn test_validation_empty_username() {
        let query = GetUserQuery {
            username: String::new(),
        };
        assert!(matches!(query.validate(), Err(GetUserError::UsernameRequired)));
    }
}
