//! Credentials and access tokens
//!
//! - **password**: argon2 hashing and verification
//! - **token**: HS256 JSON web tokens carrying the caller's identity

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenService};
