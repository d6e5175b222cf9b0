//! Command handling infrastructure.

use std::any::Any;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use events::EventRecorder;
use uuid::Uuid;

use crate::error::DomainError;

/// A request to change the state of the catalog.
///
/// Commands are plain immutable data. Exactly one [`CommandHandler`] is
/// registered for each command type on the [`CommandBus`](crate::CommandBus).
pub trait Command: Send + Sync + 'static {
    /// Unique name of the command, used in logs and metrics.
    const NAME: &'static str;

    /// What the handler returns on success.
    type Output: Send + 'static;
}

/// Handles one command type.
///
/// Handlers look up what they need through repositories, validate, mutate,
/// and save. Domain events go to the recorder; they are only dispatched once
/// the whole dispatch succeeded.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C, events: &EventRecorder) -> Result<C::Output, DomainError>;
}

/// A command in flight through the middleware chain.
pub struct Envelope {
    message_id: Uuid,
    command_name: &'static str,
    dispatched_at: DateTime<Utc>,
    recorder: EventRecorder,
    command: Box<dyn Any + Send>,
}

impl Envelope {
    /// Wraps a command with a fresh event recorder.
    pub fn new<C: Command>(command: C) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            command_name: C::NAME,
            dispatched_at: Utc::now(),
            recorder: EventRecorder::new(),
            command: Box::new(command),
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn command_name(&self) -> &'static str {
        self.command_name
    }

    pub fn dispatched_at(&self) -> DateTime<Utc> {
        self.dispatched_at
    }

    /// The recorder handed to the handler of this envelope.
    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    /// Unwraps the typed command.
    pub fn into_command<C: Command>(self) -> Result<C, DomainError> {
        let found = self.command_name;
        self.command
            .downcast::<C>()
            .map(|command| *command)
            .map_err(|_| DomainError::UnexpectedMessage {
                expected: C::NAME,
                found,
            })
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("message_id", &self.message_id)
            .field("command_name", &self.command_name)
            .field("dispatched_at", &self.dispatched_at)
            .field("recorded_events", &self.recorder.len())
            .finish_non_exhaustive()
    }
}
