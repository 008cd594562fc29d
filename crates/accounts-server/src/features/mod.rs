//! Feature modules implementing the accounts API
//!
//! Each feature is a vertical slice following the CQRS (Command Query
//! Responsibility Segregation) pattern, with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **auth**: Login and token issuance
//! - **users**: User account management and the enriched user listing
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete, login)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate.
//! Handlers are plain async functions taking a [`FeatureState`] and the request.

pub mod auth;
pub mod shared;
pub mod users;

use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenService;
use crate::db::UserStore;
use crate::enrich::TokenGenerator;

/// Shared state for all feature routes and handlers
#[derive(Clone)]
pub struct FeatureState {
    /// User persistence backend
    pub users: Arc<dyn UserStore>,
    /// Identifier source for the enriched listing
    pub generator: Arc<dyn TokenGenerator>,
    pub tokens: TokenService,
    /// Deadline for enriching one listing page; `None` waits indefinitely
    pub enrich_timeout: Option<Duration>,
}

impl FeatureState {
    pub fn new(
        users: Arc<dyn UserStore>,
        generator: Arc<dyn TokenGenerator>,
        tokens: TokenService,
        enrich_timeout: Option<Duration>,
    ) -> Self {
        Self {
            users,
            generator,
            tokens,
            enrich_timeout,
        }
    }
}

/// Creates the API router with all feature routes mounted
///
/// - `/login` - Token issuance (public)
/// - `/v1/user` - User management (bearer token required)
pub fn router(state: FeatureState) -> Router<()> {
    let protected = users::users_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        crate::middleware::require_bearer,
    ));

    Router::new()
        .merge(auth::auth_routes())
        .nest("/v1/user", protected)
        .with_state(state)
}
