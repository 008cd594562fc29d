//! In-process user store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::{DbError, DbResult, UserStore};
use crate::models::{NewUser, UserChanges, UserFilter, UserRecord};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    /// Live users keyed by id, so iteration is already in id order
    users: BTreeMap<i64, UserRecord>,
}

impl Inner {
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }
}

/// [`UserStore`] kept entirely in memory
///
/// Deleted users are dropped outright, which is indistinguishable from a
/// soft delete through the trait.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> DbResult<UserRecord> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.username_taken(&user.username, None) {
            return Err(DbError::duplicate("User", &user.username));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = UserRecord {
            id: inner.next_id,
            username: user.username,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<UserRecord>, u64)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let matching: Vec<&UserRecord> = inner
            .users
            .values()
            .filter(|u| match &filter.username {
                Some(needle) => u.username.contains(needle.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> DbResult<Option<UserRecord>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        if inner.username_taken(&changes.username, Some(id)) {
            return Err(DbError::duplicate("User", &changes.username));
        }

        Ok(inner.users.get_mut(&id).map(|user| {
            user.username = changes.username;
            user.password = changes.password_hash;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.users.remove(&id).is_some())
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: format!("hash-{}", username),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("a")).await.unwrap();
        let b = store.create(new_user("b")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let store = MemoryUserStore::new();
        store.create(new_user("admin")).await.unwrap();
        let err = store.create(new_user("admin")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_list_pages_and_filters() {
        let store = MemoryUserStore::new();
        for name in ["alice", "bob", "carol", "alicia"] {
            store.create(new_user(name)).await.unwrap();
        }

        let (page, total) = store.list(&UserFilter::default(), 1, 2).await.unwrap();
        assert_eq!(total, 4);
        let names: Vec<_> = page.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);

        let filter = UserFilter {
            username: Some("ali".to_string()),
        };
        let (page, total) = store.list(&filter, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);

        let (page, total) = store.list(&UserFilter::default(), 10, 5).await.unwrap();
        assert_eq!(total, 4);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("old")).await.unwrap();
        store.create(new_user("taken")).await.unwrap();

        let clash = UserChanges {
            username: "taken".to_string(),
            password_hash: "h".to_string(),
        };
        assert!(matches!(
            store.update(user.id, clash).await,
            Err(DbError::Duplicate(_))
        ));

        let changes = UserChanges {
            username: "new".to_string(),
            password_hash: "h2".to_string(),
        };
        let updated = store.update(user.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.username, "new");
        assert_eq!(updated.password, "h2");
        assert!(store.get_by_username("old").await.unwrap().is_none());

        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(store.get_by_username("new").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = MemoryUserStore::new();
        let changes = UserChanges {
            username: "x".to_string(),
            password_hash: "h".to_string(),
        };
        assert!(store.update(42, changes).await.unwrap().is_none());
    }
}
