use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{EventError, Result};

/// Trait for domain events.
///
/// Domain events describe something that already happened, so they are named
/// in past tense (`UserRegistered`, not `RegisterUser`).
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync {
    /// Stable name used to route the event to subscribers.
    const EVENT_TYPE: &'static str;

    /// Returns the event type name.
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }
}

/// Unique identifier for a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain event captured by an [`EventRecorder`](crate::EventRecorder),
/// together with the metadata needed to route and log it.
///
/// `Debug` leaves the payload out, since it may carry secrets.
#[derive(Clone, Serialize, serde::Deserialize)]
pub struct RecordedEvent {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The type of the event (e.g., "UserRegistered").
    pub event_type: String,

    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,

    /// Additional metadata, such as the id of the command that produced it.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RecordedEvent {
    /// Creates a new builder.
    pub fn builder() -> RecordedEventBuilder {
        RecordedEventBuilder::default()
    }

    /// Captures a typed domain event.
    pub fn from_event<E: DomainEvent>(event: &E) -> Result<Self> {
        Ok(Self::builder()
            .event_type(event.event_type())
            .payload(event)?
            .build())
    }

    /// Decodes the payload back into its typed event.
    pub fn decode<E: DomainEvent>(&self) -> Result<E> {
        if self.event_type != E::EVENT_TYPE {
            return Err(EventError::TypeMismatch {
                expected: E::EVENT_TYPE,
                found: self.event_type.clone(),
            });
        }
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    /// Returns true if the payload holds an event of type `E`.
    pub fn is<E: DomainEvent>(&self) -> bool {
        self.event_type == E::EVENT_TYPE
    }
}

impl std::fmt::Debug for RecordedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordedEvent")
            .field("event_id", &self.event_id)
            .field("event_type", &self.event_type)
            .field("occurred_at", &self.occurred_at)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RecordedEvent`].
#[derive(Default)]
pub struct RecordedEventBuilder {
    event_id: Option<EventId>,
    event_type: Option<String>,
    occurred_at: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
    metadata: HashMap<String, serde_json::Value>,
}

impl RecordedEventBuilder {
    /// Sets the event ID. If not set, a new ID will be generated.
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the timestamp. If not set, the current time will be used.
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Sets the payload from a raw JSON value.
    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Adds a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds the event. A missing type becomes `"Unknown"` and a missing
    /// payload becomes JSON `null`.
    pub fn build(self) -> RecordedEvent {
        RecordedEvent {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_else(|| "Unknown".to_string()),
            occurred_at: self.occurred_at.unwrap_or_else(Utc::now),
            payload: self.payload.unwrap_or(serde_json::Value::Null),
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct BookShelved {
        title: String,
    }

    impl DomainEvent for BookShelved {
        const EVENT_TYPE: &'static str = "BookShelved";
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct ShelfEmptied;

    impl DomainEvent for ShelfEmptied {
        const EVENT_TYPE: &'static str = "ShelfEmptied";
    }

    #[test]
    fn from_event_captures_type_and_payload() {
        let recorded = RecordedEvent::from_event(&BookShelved {
            title: "Dune".to_string(),
        })
        .unwrap();

        assert_eq!(recorded.event_type, "BookShelved");
        assert_eq!(recorded.payload["title"], "Dune");
        assert!(recorded.is::<BookShelved>());
        assert!(!recorded.is::<ShelfEmptied>());
    }

    #[test]
    fn decode_returns_typed_event() {
        let recorded = RecordedEvent::from_event(&BookShelved {
            title: "Emma".to_string(),
        })
        .unwrap();

        let decoded: BookShelved = recorded.decode().unwrap();
        assert_eq!(decoded.title, "Emma");
    }

    #[test]
    fn decode_rejects_other_event_type() {
        let recorded = RecordedEvent::from_event(&ShelfEmptied).unwrap();
        let err = recorded.decode::<BookShelved>().unwrap_err();
        assert!(matches!(err, EventError::TypeMismatch { .. }));
    }

    #[test]
    fn debug_omits_payload() {
        let recorded = RecordedEvent::from_event(&BookShelved {
            title: "secret-482913".to_string(),
        })
        .unwrap();

        let debug = format!("{recorded:?}");
        assert!(debug.contains("BookShelved"));
        assert!(!debug.contains("482913"));
    }

    #[test]
    fn builder_fills_defaults() {
        let event = RecordedEvent::builder()
            .metadata("command", "CreateUser")
            .build();

        assert_eq!(event.event_type, "Unknown");
        assert!(event.payload.is_null());
        assert_eq!(event.metadata["command"], "CreateUser");
    }
}
