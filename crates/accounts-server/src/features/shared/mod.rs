//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **pagination**: Offset/limit window and response metadata
//! - **validation**: Input validation for usernames and passwords
//! - **error_helpers**: Database error handling utilities
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod error_helpers;
pub mod pagination;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use pagination::{PageWindow, PaginationMetadata};
pub use validation::{validate_password, validate_username, CredentialValidationError};
