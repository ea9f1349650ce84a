//! Task state - a pure projection of an external request/response call.
//!
//! External calls (summarization, geolocation) are modeled as explicit
//! request/response tasks. UI-facing state is a projection of where the
//! task currently is, independent of any particular concurrency primitive:
//! idle, pending, succeeded with a value, or failed with a message.

use serde::{Deserialize, Serialize};

/// Lifecycle of a single external request/response task.
///
/// A task starts [`Idle`](TaskState::Idle), moves to
/// [`Pending`](TaskState::Pending) when the request is issued, and settles
/// as either [`Succeeded`](TaskState::Succeeded) or
/// [`Failed`](TaskState::Failed). Failures carry a human-readable message
/// suitable for a dismissible notice; they are never fatal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState<T> {
    /// No request has been issued yet
    #[default]
    Idle,
    /// A request is in flight
    Pending,
    /// The request completed with a value
    Succeeded(T),
    /// The request failed with a human-readable message
    Failed(String),
}

impl<T> TaskState<T> {
    /// Returns true while a request is in flight
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true once the task has settled, successfully or not
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    /// The successful value, if the task succeeded
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the task failed
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
