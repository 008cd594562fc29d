//! Accounts Server Library
//!
//! HTTP server for managing user accounts.
//!
//! # Overview
//!
//! - **API Endpoints**: login, user CRUD and an enriched user listing
//! - **Database Management**: PostgreSQL integration with SQLx behind the [`db::UserStore`] trait
//! - **Enrichment**: the [`enrich`] pipeline fans a page of users out across tokio tasks
//!   and reassembles the results in their original order
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, request ids, tracing, bearer authentication, panic recovery
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** architecture:
//!
//! - **Commands** (Write Operations): create, update, delete and login
//! - **Queries** (Read Operations): get a user, list users
//!
//! Each lives in a feature slice under [`features`] with its own error type and
//! route module.
//!
//! # Example
//!
//! ```no_run
//! use accounts_server::{api, auth::TokenService, db::MemoryUserStore, enrich::ShortIdGenerator};
//! use accounts_server::{config::Config, features::FeatureState};
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let state = FeatureState::new(
//!         Arc::new(MemoryUserStore::new()),
//!         Arc::new(ShortIdGenerator),
//!         TokenService::new(&config.auth.jwt_secret, Duration::from_secs(3600)),
//!         config.enrich.deadline(),
//!     );
//!     let app = api::create_router(state, &config.cors);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod enrich;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use error::AppError;
