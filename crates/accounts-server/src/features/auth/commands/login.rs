//! Login command
//!
//! Verifies a username/password pair and issues a signed access token.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::auth::{verify_password, PasswordError, TokenError};
use crate::db::DbError;
use crate::features::shared::validation::{
    validate_password, validate_username, CredentialValidationError,
};
use crate::features::FeatureState;

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(#[from] CredentialValidationError),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("The password was incorrect")]
    IncorrectPassword,

    #[error("Password verification failed: {0}")]
    Verification(PasswordError),

    #[error("Token issuance failed: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<LoginResponse, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

impl LoginCommand {
    pub fn validate(&self) -> Result<(), LoginError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

#[tracing::instrument(skip(state, command), fields(username = %command.username))]
pub async fn handle(
    state: FeatureState,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    command.validate()?;

    let user = state
        .users
        .get_by_username(&command.username)
        .await?
        .ok_or_else(|| LoginError::UserNotFound(command.username.clone()))?;

    verify_password(&command.password, &user.password).map_err(|e| match e {
        PasswordError::Mismatch => LoginError::IncorrectPassword,
        other => LoginError::Verification(other),
    })?;

    let token = state.tokens.sign(user.id, &user.username)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginResponse { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{memory_state, seed_user};

    fn command(username: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let state = memory_state();
        let user = seed_user(&state, "admin", "admin").await;

        let response = handle(state.clone(), command("admin", "admin")).await.unwrap();
        let claims = state.tokens.parse(&response.token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.username, "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let state = memory_state();
        seed_user(&state, "admin", "admin").await;

        let result = handle(state, command("admin", "wrong-password")).await;
        assert!(matches!(result, Err(LoginError::IncorrectPassword)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let result = handle(memory_state(), command("nobody", "whatever")).await;
        assert!(matches!(result, Err(LoginError::UserNotFound(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", command("admin", "topsecret"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("topsecret"));
    }
}
