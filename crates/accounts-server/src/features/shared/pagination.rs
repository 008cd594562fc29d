//! Shared pagination utilities
//!
//! Listing endpoints page with a raw `offset`/`limit` pair rather than page
//! numbers.
//!
//! ```rust,ignore
//! let window = PageWindow::new(Some(40), Some(20));
//! window.validate()?;
//! // After fetching data...
//! let meta = PaginationMetadata::new(&window, rows.len(), total);
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Requested slice of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows to skip. Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Rows to return. Defaults to 20, at most 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl PageWindow {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Reject explicit values outside the accepted range
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err("Offset must not be negative");
            }
        }
        if let Some(limit) = self.limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err("Limit must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// Pagination metadata for response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    /// Total number of matching rows
    pub total: u64,
    /// Whether rows remain past this window
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(window: &PageWindow, returned: usize, total: u64) -> Self {
        let consumed = window.offset().max(0) as u64 + returned as u64;
        Self {
            offset: window.offset(),
            limit: window.limit(),
            total,
            has_more: consumed < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let window = PageWindow::default();
        assert_eq!(window.offset(), 0);
        assert_eq!(window.limit(), 20);
        assert!(window.validate().is_ok());
    }

    #[test]
    fn test_window_clamping() {
        let window = PageWindow::new(Some(-5), Some(500));
        assert_eq!(window.offset(), 0);
        assert_eq!(window.limit(), 100);
    }

    #[test]
    fn test_window_validation() {
        assert!(PageWindow::new(Some(0), Some(100)).validate().is_ok());
        assert_eq!(
            PageWindow::new(Some(-1), None).validate(),
            Err("Offset must not be negative")
        );
        assert_eq!(
            PageWindow::new(None, Some(0)).validate(),
            Err("Limit must be between 1 and 100")
        );
        assert_eq!(
            PageWindow::new(None, Some(101)).validate(),
            Err("Limit must be between 1 and 100")
        );
    }

    #[test]
    fn test_metadata_has_more() {
        let window = PageWindow::new(Some(10), Some(10));
        let meta = PaginationMetadata::new(&window, 10, 25);
        assert_eq!(meta.offset, 10);
        assert_eq!(meta.limit, 10);
        assert!(meta.has_more);

        let last = PaginationMetadata::new(&PageWindow::new(Some(20), Some(10)), 5, 25);
        assert!(!last.has_more);
    }

    #[test]
    fn test_metadata_empty() {
        let meta = PaginationMetadata::new(&PageWindow::default(), 0, 0);
        assert_eq!(meta.total, 0);
        assert!(!meta.has_more);
    }
}
