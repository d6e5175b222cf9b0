use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{RecordedEvent, Result};

/// Delivers released domain events to whoever reacts to them.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Dispatches a single event.
    async fn dispatch(&self, event: &RecordedEvent) -> Result<()>;
}

/// Reacts to one or more event types.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// The event types this subscriber wants to receive.
    fn subscribed_events(&self) -> &[&'static str];

    /// Handles an event of one of the subscribed types.
    async fn handle(&self, event: &RecordedEvent) -> Result<()>;
}

/// An [`EventDispatcher`] that fans events out to registered subscribers.
///
/// Subscribers of the same event type run in registration order. The first
/// failing subscriber stops delivery of that event.
#[derive(Default, Clone)]
pub struct SubscriberRegistry {
    subscribers: HashMap<&'static str, Vec<Arc<dyn EventSubscriber>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber under every event type it subscribes to.
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        for event_type in subscriber.subscribed_events() {
            self.subscribers
                .entry(*event_type)
                .or_default()
                .push(subscriber.clone());
        }
    }

    /// Builder-style variant of [`subscribe`](Self::subscribe).
    pub fn with(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribe(subscriber);
        self
    }

    /// Number of subscribers registered for an event type.
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.subscribers.get(event_type).map_or(0, Vec::len)
    }
}

#[async_trait]
impl EventDispatcher for SubscriberRegistry {
    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type, event_id = %event.event_id))]
    async fn dispatch(&self, event: &RecordedEvent) -> Result<()> {
        let Some(subscribers) = self.subscribers.get(event.event_type.as_str()) else {
            tracing::debug!("no subscriber for event");
            return Ok(());
        };

        for subscriber in subscribers {
            tracing::debug!(subscriber = subscriber.name(), "delivering event");
            subscriber.handle(event).await?;
        }

        metrics::counter!("events_dispatched_total", "event_type" => event.event_type.clone())
            .increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tokio::sync::Mutex;

    use super::*;
    use crate::{DomainEvent, EventError};

    #[derive(Debug, Serialize, Deserialize)]
    struct Borrowed {
        title: String,
    }

    impl DomainEvent for Borrowed {
        const EVENT_TYPE: &'static str = "Borrowed";
    }

    struct Journal {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl EventSubscriber for Journal {
        fn name(&self) -> &'static str {
            self.name
        }

        fn subscribed_events(&self) -> &[&'static str] {
            &[Borrowed::EVENT_TYPE]
        }

        async fn handle(&self, event: &RecordedEvent) -> Result<()> {
            if self.fail {
                return Err(EventError::Subscriber {
                    subscriber: self.name,
                    event_type: event.event_type.clone(),
                    reason: "journal closed".to_string(),
                });
            }
            let borrowed: Borrowed = event.decode()?;
            self.seen
                .lock()
                .await
                .push(format!("{}:{}", self.name, borrowed.title));
            Ok(())
        }
    }

    fn borrowed(title: &str) -> RecordedEvent {
        RecordedEvent::from_event(&Borrowed {
            title: title.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn delivers_to_subscribers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = SubscriberRegistry::new()
            .with(Arc::new(Journal {
                name: "first",
                seen: seen.clone(),
                fail: false,
            }))
            .with(Arc::new(Journal {
                name: "second",
                seen: seen.clone(),
                fail: false,
            }));

        registry.dispatch(&borrowed("Ulysses")).await.unwrap();

        assert_eq!(
            *seen.lock().await,
            vec!["first:Ulysses".to_string(), "second:Ulysses".to_string()]
        );
        assert_eq!(registry.subscriber_count("Borrowed"), 2);
    }

    #[tokio::test]
    async fn events_without_subscribers_are_ignored() {
        let registry = SubscriberRegistry::new();
        let event = RecordedEvent::builder().event_type("Returned").build();
        assert!(registry.dispatch(&event).await.is_ok());
    }

    #[tokio::test]
    async fn failing_subscriber_stops_delivery() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = SubscriberRegistry::new()
            .with(Arc::new(Journal {
                name: "broken",
                seen: seen.clone(),
                fail: true,
            }))
            .with(Arc::new(Journal {
                name: "after",
                seen: seen.clone(),
                fail: false,
            }));

        let err = registry.dispatch(&borrowed("Emma")).await.unwrap_err();

        assert!(matches!(err, EventError::Subscriber { subscriber: "broken", .. }));
        assert!(seen.lock().await.is_empty());
    }
}
