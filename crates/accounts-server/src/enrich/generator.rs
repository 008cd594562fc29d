//! Short identifier derivation
//!
//! Every enriched row gets a fresh identifier mixed into its greeting. The
//! capability is a trait so tests can swap in deterministic or failing
//! implementations.

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::TryRngCore;
use thiserror::Error;

/// Length of a generated short id
pub const SHORT_ID_LEN: usize = 9;

const ALPHABET: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Failure to derive an identifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Randomness source unavailable: {0}")]
    Entropy(String),

    #[error("Identifier derivation failed for record {id}: {reason}")]
    Rejected { id: i64, reason: String },
}

/// Produces the identifier embedded in a record's greeting
#[async_trait]
pub trait TokenGenerator: Send + Sync + 'static {
    /// Derive an identifier for the record keyed by `id`
    async fn generate(&self, id: i64) -> Result<String, DerivationError>;
}

/// Random 9-character id over `0-9a-zA-Z_-`, seeded from the OS
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortIdGenerator;

#[async_trait]
impl TokenGenerator for ShortIdGenerator {
    async fn generate(&self, _id: i64) -> Result<String, DerivationError> {
        let mut bytes = [0u8; SHORT_ID_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DerivationError::Entropy(e.to_string()))?;

        Ok(bytes
            .iter()
            .map(|b| ALPHABET[(b & 0x3f) as usize] as char)
            .collect())
    }
}
