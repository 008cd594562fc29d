//! List users query
//!
//! Fetches one page of users and runs it through the enrichment pipeline, so
//! every row comes back with a freshly derived greeting.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::enrich::{enrich, EnrichError};
use crate::features::shared::pagination::{PageWindow, PaginationMetadata};
use crate::features::FeatureState;
use crate::models::{UserFilter, UserInfo};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    /// Substring of the username to match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    /// Total users matching the filter, across all pages
    pub total_count: u64,
    pub user_list: Vec<UserInfo>,
    #[serde(skip)]
    pub pagination: PaginationMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

impl Request<Result<ListUsersResponse, ListUsersError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

impl ListUsersQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.offset, self.limit)
    }

    pub fn validate(&self) -> Result<(), ListUsersError> {
        self.window()
            .validate()
            .map_err(ListUsersError::InvalidPagination)
    }

    fn filter(&self) -> UserFilter {
        UserFilter {
            username: self.username.clone().filter(|name| !name.is_empty()),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListUsersQuery,
) -> Result<ListUsersResponse, ListUsersError> {
    query.validate()?;

    let window = query.window();
    let (records, total) = state
        .users
        .list(&query.filter(), window.offset(), window.limit())
        .await?;

    let user_list = enrich(records, state.generator.clone(), state.enrich_timeout).await?;

    tracing::debug!(returned = user_list.len(), total, "Listed users");

    Ok(ListUsersResponse {
        total_count: total,
        pagination: PaginationMetadata::new(&window, user_list.len(), total),
        user_list,
    })
}
