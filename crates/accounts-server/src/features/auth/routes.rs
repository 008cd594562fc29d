//! Authentication routes
//!
//! - `POST /login` - Exchange username and password for a bearer token

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::commands::{LoginCommand, LoginError};
use crate::features::FeatureState;

pub fn auth_routes() -> Router<FeatureState> {
    Router::new().route("/login", post(login))
}

/// # Response
///
/// - `200 OK` - `{ token }`
/// - `400 Bad Request` - Validation error
/// - `401 Unauthorized` - Wrong password
/// - `404 Not Found` - Unknown username
#[tracing::instrument(skip(state, command), fields(username = %command.username))]
async fn login(
    State(state): State<FeatureState>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AuthApiError> {
    let response = super::commands::login::handle(state, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct AuthApiError(#[from] LoginError);

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            LoginError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            },
            LoginError::UserNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            LoginError::IncorrectPassword => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            },
            LoginError::Verification(_) | LoginError::Token(_) | LoginError::Database(_) => {
                tracing::error!("Login failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthApiError(LoginError::IncorrectPassword)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthApiError(LoginError::UserNotFound("x".into()))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }
}
