use std::sync::Weak;

use async_trait::async_trait;
use events::{DomainEvent, EventError, EventSubscriber, RecordedEvent};

use super::{SendUserWelcomeEmail, UserRegistered};
use crate::bus::CommandBus;

/// Sends the welcome mail once a user is registered, by dispatching
/// [`SendUserWelcomeEmail`] on the command bus.
///
/// Holds the bus weakly: the bus owns the middleware that owns this
/// subscriber.
pub struct WelcomeEmailSubscriber {
    bus: Weak<CommandBus>,
}

impl WelcomeEmailSubscriber {
    pub const NAME: &'static str = "WelcomeEmailSubscriber";

    pub fn new(bus: Weak<CommandBus>) -> Self {
        Self { bus }
    }

    fn failure(event: &RecordedEvent, reason: impl ToString) -> EventError {
        EventError::Subscriber {
            subscriber: Self::NAME,
            event_type: event.event_type.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl EventSubscriber for WelcomeEmailSubscriber {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn subscribed_events(&self) -> &[&'static str] {
        &[UserRegistered::EVENT_TYPE]
    }

    async fn handle(&self, event: &RecordedEvent) -> events::Result<()> {
        let registered: UserRegistered = event.decode()?;
        let bus = self
            .bus
            .upgrade()
            .ok_or_else(|| Self::failure(event, "command bus is gone"))?;

        bus.dispatch(SendUserWelcomeEmail {
            name: registered.name,
            email: registered.email,
            plain_password: registered.plain_password,
        })
        .await
        .map_err(|e| Self::failure(event, e))
    }
}
