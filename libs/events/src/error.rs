//! Error types for event construction and kind handling.

use thiserror::Error;

use crate::EventKind;

/// Errors that can occur when constructing or classifying events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The event kind requires a user and none was supplied.
    #[error("{kind} event requires a user")]
    UserRequired { kind: EventKind },

    /// The event kind name is not one of the closed set.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),
}

impl EventError {
    /// Returns true if this error was raised at construction time.
    pub fn is_construction_error(&self) -> bool {
        matches!(self, EventError::UserRequired { .. })
    }
}
