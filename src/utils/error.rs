//! The `error` module defines custom error types used within the `topicbus` library.
//!
//! This module centralizes error handling, providing a consistent way to
//! represent and propagate errors throughout the system.

use thiserror::Error;

/// An error reported by a subscriber callback.
///
/// Handlers construct one with [`HandlerError::new`] to signal that they
/// could not process a delivery. It is only ever surfaced to a publisher
/// through [`Bus::try_publish`](crate::Bus::try_publish); best-effort
/// publishing logs and discards it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error carrying the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message the handler reported.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by bus operations.
///
/// Apart from a failing handler under strict delivery, no bus operation
/// fails under normal use: a topic name that was never subscribed to is
/// valid input everywhere and always succeeds as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// A handler failed during strict delivery.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
}
