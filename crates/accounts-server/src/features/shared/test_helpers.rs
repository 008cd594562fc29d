//! Test fixtures for feature handlers

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{hash_password, TokenService};
use crate::db::MemoryUserStore;
use crate::enrich::{DerivationError, TokenGenerator};
use crate::features::FeatureState;
use crate::models::{NewUser, UserRecord};

pub const TEST_SECRET: &str = "test-secret";

/// Maps a record id to `X<id>`
pub struct FixedGenerator;

#[async_trait]
impl TokenGenerator for FixedGenerator {
    async fn generate(&self, id: i64) -> Result<String, DerivationError> {
        Ok(format!("X{}", id))
    }
}

/// Always fails
pub struct BrokenGenerator;

#[async_trait]
impl TokenGenerator for BrokenGenerator {
    async fn generate(&self, _id: i64) -> Result<String, DerivationError> {
        Err(DerivationError::Entropy("unavailable".to_string()))
    }
}

pub fn state_with(generator: Arc<dyn TokenGenerator>) -> FeatureState {
    FeatureState::new(
        Arc::new(MemoryUserStore::new()),
        generator,
        TokenService::new(TEST_SECRET, Duration::from_secs(3600)),
        Some(Duration::from_secs(5)),
    )
}

pub fn memory_state() -> FeatureState {
    state_with(Arc::new(FixedGenerator))
}

/// Insert a user with a real argon2 hash of `password`
pub async fn seed_user(state: &FeatureState, username: &str, password: &str) -> UserRecord {
    state
        .users
        .create(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
        })
        .await
        .unwrap()
}
