//! CQRS markers
//!
//! Commands change state; queries only read it. The traits carry no behavior
//! and exist so layers and tests can tell the two apart at the type level.

/// Marker for state-changing requests
pub trait Command: Send + 'static {}

/// Marker for read-only requests
pub trait Query: Send + 'static {}
