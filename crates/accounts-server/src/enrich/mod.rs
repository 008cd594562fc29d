//! Concurrent enrichment pipeline
//!
//! Turns a page of [`UserRecord`]s into [`UserInfo`] views. Each record is
//! enriched on its own tokio task; results land in a shared [`ResultStore`]
//! keyed by id and are read back in the order the records arrived, so task
//! completion order never leaks into the output.
//!
//! The batch is all-or-nothing. The first failure observed wins, every other
//! in-flight task is aborted and no partial output is returned.
//!
//! ```rust,ignore
//! let views = enrich(records, Arc::new(ShortIdGenerator), Some(Duration::from_secs(5))).await?;
//! ```

pub mod generator;
pub mod store;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::models::{UserInfo, UserRecord};

pub use generator::{DerivationError, ShortIdGenerator, TokenGenerator};
pub use store::{reproject, ResultStore};

/// Reasons a batch fails to enrich
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error("Enriched view missing for record {id}")]
    Consistency { id: i64 },

    #[error("Record {id} was enriched more than once")]
    DuplicateKey { id: i64 },

    #[error("Enrichment worker failed: {0}")]
    Worker(String),

    #[error("Enrichment did not finish within {0:?}")]
    Timeout(Duration),
}

/// Enrich `records`, preserving their order
///
/// `deadline` bounds the whole batch; `None` waits indefinitely.
pub async fn enrich(
    records: Vec<UserRecord>,
    generator: Arc<dyn TokenGenerator>,
    deadline: Option<Duration>,
) -> Result<Vec<UserInfo>, EnrichError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let manifest: Vec<i64> = records.iter().map(|r| r.id).collect();
    tracing::debug!(count = manifest.len(), "Enriching records");

    let entries = match deadline {
        Some(limit) => tokio::time::timeout(limit, fan_out(records, generator))
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?limit, "Enrichment deadline elapsed");
                EnrichError::Timeout(limit)
            })??,
        None => fan_out(records, generator).await?,
    };

    reproject(&manifest, entries)
}

/// Spawn one worker per record and wait for all of them or the first failure
///
/// Dropping the returned future drops the `JoinSet`, which aborts any worker
/// still running.
pub(crate) async fn fan_out(
    records: Vec<UserRecord>,
    generator: Arc<dyn TokenGenerator>,
) -> Result<HashMap<i64, UserInfo>, EnrichError> {
    let store = Arc::new(ResultStore::with_capacity(records.len()));
    let mut workers = JoinSet::new();

    for record in records {
        let store = Arc::clone(&store);
        let generator = Arc::clone(&generator);
        workers.spawn(async move {
            let short_id = generator.generate(record.id).await?;
            store.insert(UserInfo::from_record(record, &short_id))
        });
    }

    while let Some(joined) = workers.join_next().await {
        let outcome = joined.unwrap_or_else(|e| Err(worker_error(e)));
        if let Err(err) = outcome {
            workers.abort_all();
            tracing::warn!(error = %err, "Enrichment aborted");
            return Err(err);
        }
    }

    Ok(store.take())
}

fn worker_error(err: JoinError) -> EnrichError {
    if err.is_panic() {
        EnrichError::Worker(format!("panicked: {}", panic_message(err.into_panic())))
    } else {
        EnrichError::Worker(err.to_string())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
