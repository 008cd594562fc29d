//! Test helpers for accounts server integration tests
//!
//! Every [`TestApp`] runs the full router over an in-memory user store, so
//! these tests need no database.

#![allow(dead_code)]

use accounts_server::{
    api,
    auth::{hash_password, TokenService},
    config::CorsConfig,
    db::{MemoryUserStore, UserStore},
    enrich::{DerivationError, TokenGenerator},
    features::FeatureState,
    models::{NewUser, UserRecord},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-secret";

/// Maps a record id to `X<id>`
pub struct FixedGenerator;

#[async_trait]
impl TokenGenerator for FixedGenerator {
    async fn generate(&self, id: i64) -> Result<String, DerivationError> {
        Ok(format!("X{}", id))
    }
}

/// Never answers within any reasonable deadline
pub struct StalledGenerator;

#[async_trait]
impl TokenGenerator for StalledGenerator {
    async fn generate(&self, id: i64) -> Result<String, DerivationError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(format!("X{}", id))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: FeatureState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(Arc::new(FixedGenerator), Some(Duration::from_secs(5)))
    }

    pub fn with_generator(
        generator: Arc<dyn TokenGenerator>,
        enrich_timeout: Option<Duration>,
    ) -> Self {
        let state = FeatureState::new(
            Arc::new(MemoryUserStore::new()),
            generator,
            TokenService::new(TEST_SECRET, Duration::from_secs(3600)),
            enrich_timeout,
        );
        let cors = CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: true,
        };

        Self {
            router: api::create_router(state.clone(), &cors),
            state,
        }
    }

    pub async fn seed_user(&self, username: &str, password: &str) -> UserRecord {
        self.state
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash: hash_password(password).unwrap(),
            })
            .await
            .unwrap()
    }

    pub fn token_for(&self, user: &UserRecord) -> String {
        self.state.tokens.sign(user.id, &user.username).unwrap()
    }

    /// Send a request and decode the JSON body (`Value::Null` for non-JSON bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}
