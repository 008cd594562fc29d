//! Keyed result store shared by one pipeline invocation

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::EnrichError;
use crate::models::UserInfo;

/// Write-once map from record id to its enriched view
///
/// The lock guards a single insert and is never held across an await point.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Mutex<HashMap<i64, UserInfo>>,
}

impl ResultStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Record the view for `info.id`; a second write for the same id is rejected
    pub fn insert(&self, info: UserInfo) -> Result<(), EnrichError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&info.id) {
            return Err(EnrichError::DuplicateKey { id: info.id });
        }
        entries.insert(info.id, info);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every entry out, leaving the store empty
    pub fn take(&self) -> HashMap<i64, UserInfo> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Rebuild the output in manifest order
///
/// A manifest id without an entry is an invariant violation and is reported,
/// never skipped.
pub fn reproject(
    manifest: &[i64],
    mut entries: HashMap<i64, UserInfo>,
) -> Result<Vec<UserInfo>, EnrichError> {
    manifest
        .iter()
        .map(|id| {
            entries
                .remove(id)
                .ok_or(EnrichError::Consistency { id: *id })
        })
        .collect()
}
