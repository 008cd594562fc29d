//! User API routes
//!
//! # Route Structure
//!
//! All routes sit behind the bearer token middleware.
//!
//! - `POST /v1/user` - Create a new user
//! - `GET /v1/user` - List users with enrichment, offset/limit paging and a username filter
//! - `GET /v1/user/:username` - Get a single user by username
//! - `PUT /v1/user/:id` - Replace a user's username and password
//! - `DELETE /v1/user/:id` - Soft delete a user

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::Claims;
use crate::enrich::EnrichError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;

use super::{
    commands::{
        CreateUserCommand, CreateUserError, DeleteUserCommand, DeleteUserError,
        UpdateUserCommand, UpdateUserError,
    },
    queries::{GetUserError, GetUserQuery, ListUsersError, ListUsersQuery},
};
use crate::features::FeatureState;

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the users router
///
/// `GET /:username` and `PUT|DELETE /:id` share one path segment; axum routes
/// them by method.
pub fn users_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:key", get(get_user).put(update_user).delete(delete_user))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a new user
///
/// # Response
///
/// - `201 Created` - User created successfully
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Username already taken
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(
    skip(state, caller, command),
    fields(caller = %caller.username, username = %command.username)
)]
async fn create_user(
    State(state): State<FeatureState>,
    Extension(caller): Extension<Claims>,
    Json(command): Json<CreateUserCommand>,
) -> Result<Response, UsersApiError> {
    let response = super::commands::create::handle(state, command).await?;

    tracing::info!(user_id = response.id, "User created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Replace username and password of an existing user
///
/// # Response
///
/// - `200 OK` - User updated
/// - `400 Bad Request` - Validation error or non-numeric id
/// - `404 Not Found` - No live user with that id
/// - `409 Conflict` - New username already taken
#[tracing::instrument(skip(state, caller, command), fields(caller = %caller.username))]
async fn update_user(
    State(state): State<FeatureState>,
    Extension(caller): Extension<Claims>,
    Path(key): Path<String>,
    Json(mut command): Json<UpdateUserCommand>,
) -> Result<Response, UsersApiError> {
    command.id = parse_id(&key)?;

    let response = super::commands::update::handle(state, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Soft delete a user
#[tracing::instrument(skip(state, caller), fields(caller = %caller.username))]
async fn delete_user(
    State(state): State<FeatureState>,
    Extension(caller): Extension<Claims>,
    Path(key): Path<String>,
) -> Result<Response, UsersApiError> {
    let command = DeleteUserCommand { id: parse_id(&key)? };

    let response = super::commands::delete::handle(state, command).await?;

    tracing::info!(user_id = response.id, "User deleted via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state))]
async fn get_user(
    State(state): State<FeatureState>,
    Path(key): Path<String>,
) -> Result<Response, UsersApiError> {
    let response = super::queries::get::handle(state, GetUserQuery { username: key }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// List users, each enriched with a fresh greeting
///
/// # Query Parameters
///
/// - `username` - Filter by username substring
/// - `offset` - Rows to skip (default: 0)
/// - `limit` - Rows to return (default: 20, max: 100)
///
/// # Response
///
/// - `200 OK` - `{ totalCount, userList }` with pagination metadata
/// - `400 Bad Request` - Invalid offset or limit
/// - `502 Bad Gateway` - Identifier derivation failed
/// - `504 Gateway Timeout` - Enrichment deadline elapsed
#[tracing::instrument(
    skip(state, query),
    fields(offset = ?query.offset, limit = ?query.limit)
)]
async fn list_users(
    State(state): State<FeatureState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Response, UsersApiError> {
    let response = super::queries::list::handle(state, query).await?;

    tracing::debug!(
        count = response.user_list.len(),
        total = response.total_count,
        "Users listed via API"
    );

    let meta = json!({
        "pagination": response.pagination
    });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response, meta))).into_response())
}

fn parse_id(key: &str) -> Result<i64, UsersApiError> {
    key.parse()
        .map_err(|_| UsersApiError::InvalidId(key.to_string()))
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for user API endpoints
#[derive(Debug, thiserror::Error)]
enum UsersApiError {
    #[error("User id '{0}' is not a valid integer")]
    InvalidId(String),
    #[error(transparent)]
    Create(#[from] CreateUserError),
    #[error(transparent)]
    Update(#[from] UpdateUserError),
    #[error(transparent)]
    Delete(#[from] DeleteUserError),
    #[error(transparent)]
    Get(#[from] GetUserError),
    #[error(transparent)]
    List(#[from] ListUsersError),
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

fn database_error(context: &str, err: &UsersApiError) -> Response {
    tracing::error!("Database error during {}: {}", context, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "A database error occurred",
    )
}

fn enrich_error(err: &EnrichError) -> Response {
    match err {
        EnrichError::Derivation(_) => {
            tracing::error!("Identifier derivation failed: {}", err);
            error_response(StatusCode::BAD_GATEWAY, "DERIVATION_FAILED", err.to_string())
        },
        EnrichError::Timeout(_) => {
            error_response(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", err.to_string())
        },
        EnrichError::Consistency { .. }
        | EnrichError::DuplicateKey { .. }
        | EnrichError::Worker(_) => {
            tracing::error!("Enrichment failed: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            )
        },
    }
}

impl IntoResponse for UsersApiError {
    fn into_response(self) -> Response {
        match &self {
            UsersApiError::InvalidId(_)
            | UsersApiError::Create(CreateUserError::Validation(_))
            | UsersApiError::Update(UpdateUserError::Validation(_))
            | UsersApiError::Get(GetUserError::UsernameRequired)
            | UsersApiError::List(ListUsersError::InvalidPagination(_)) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            },

            UsersApiError::Create(CreateUserError::DuplicateUsername(_))
            | UsersApiError::Update(UpdateUserError::DuplicateUsername(_)) => {
                error_response(StatusCode::CONFLICT, "CONFLICT", self.to_string())
            },

            UsersApiError::Update(UpdateUserError::NotFound(_))
            | UsersApiError::Delete(DeleteUserError::NotFound(_))
            | UsersApiError::Get(GetUserError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            },

            UsersApiError::Create(CreateUserError::Hashing(_))
            | UsersApiError::Update(UpdateUserError::Hashing(_)) => {
                tracing::error!("Password hashing failed: {}", self);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
            },

            UsersApiError::Create(CreateUserError::Database(_)) => {
                database_error("user creation", &self)
            },
            UsersApiError::Update(UpdateUserError::Database(_)) => {
                database_error("user update", &self)
            },
            UsersApiError::Delete(DeleteUserError::Database(_)) => {
                database_error("user deletion", &self)
            },
            UsersApiError::Get(GetUserError::Database(_)) => {
                database_error("user retrieval", &self)
            },
            UsersApiError::List(ListUsersError::Database(_)) => {
                database_error("user listing", &self)
            },

            UsersApiError::List(ListUsersError::Enrich(err)) => enrich_error(err),
        }
    }
}
