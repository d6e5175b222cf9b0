use thiserror::Error;

/// Errors that can occur while recording or dispatching domain events.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A payload was decoded as the wrong event type.
    #[error("Event type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A subscriber failed to handle an event.
    #[error("Subscriber '{subscriber}' failed on {event_type}: {reason}")]
    Subscriber {
        subscriber: &'static str,
        event_type: String,
        reason: String,
    },
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;
