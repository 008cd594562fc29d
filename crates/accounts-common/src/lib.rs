//! Accounts Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//!
//! Shared utilities for the accounts workspace.
//!
//! # Overview
//!
//! - **Logging**: centralized `tracing` subscriber setup driven by the environment
//! - **Time**: display formatting for timestamps returned to API clients
//!
//! # Example
//!
//! ```no_run
//! use accounts_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("Service started");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod time;

pub use time::{format_display, DISPLAY_FORMAT};
