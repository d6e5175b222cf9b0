//! Middleware shipped with the domain layer.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use events::EventDispatcher;
use tracing::Instrument;

use crate::bus::{Middleware, Next, Outcome};
use crate::command::Envelope;
use crate::error::DomainError;

/// Opens a span per command and records dispatch metrics.
///
/// Only the command name is logged; commands may carry passwords.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

#[async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Outcome, DomainError> {
        let command = envelope.command_name();
        let span = tracing::info_span!(
            "command",
            command,
            message_id = %envelope.message_id()
        );
        let start = Instant::now();

        let result = next.run(envelope).instrument(span.clone()).await;

        let elapsed = start.elapsed().as_secs_f64();
        metrics::histogram!("command_duration_seconds", "command" => command).record(elapsed);
        metrics::counter!("commands_dispatched_total", "command" => command).increment(1);

        span.in_scope(|| match &result {
            Ok(_) => tracing::debug!(elapsed_secs = elapsed, "command handled"),
            Err(e) => {
                metrics::counter!("commands_failed_total", "command" => command).increment(1);
                tracing::warn!(error = %e, "command failed");
            }
        });
        result
    }
}

/// Hands events recorded during a successful dispatch to the event
/// dispatcher, in recording order. Events of a failed dispatch are erased.
///
/// Subscriber failures are logged and counted but never fail the command
/// that produced the event: its changes are already saved.
#[derive(Clone)]
pub struct ReleaseRecordedEventsMiddleware {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl ReleaseRecordedEventsMiddleware {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Middleware for ReleaseRecordedEventsMiddleware {
    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Outcome, DomainError> {
        let recorder = envelope.recorder().clone();
        let message_id = envelope.message_id();

        let outcome = match next.run(envelope).await {
            Ok(outcome) => outcome,
            Err(e) => {
                recorder.erase_events();
                return Err(e);
            }
        };

        for event in recorder.release_events() {
            if let Err(e) = self.dispatcher.dispatch(&event).await {
                metrics::counter!(
                    "events_dispatch_failed_total",
                    "event_type" => event.event_type.clone()
                )
                .increment(1);
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    %message_id,
                    "failed to dispatch recorded event"
                );
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use events::{DomainEvent, EventError, EventRecorder, RecordedEvent};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::bus::CommandBus;
    use crate::command::{Command, CommandHandler};

    #[derive(Debug, Serialize, Deserialize)]
    struct Noted(u32);

    impl DomainEvent for Noted {
        const EVENT_TYPE: &'static str = "Noted";
    }

    struct Note {
        count: u32,
        fail: bool,
    }

    impl Command for Note {
        const NAME: &'static str = "Note";
        type Output = u32;
    }

    struct NoteHandler;

    #[async_trait]
    impl CommandHandler<Note> for NoteHandler {
        async fn handle(&self, command: Note, events: &EventRecorder) -> Result<u32, DomainError> {
            for n in 0..command.count {
                events.record(&Noted(n))?;
            }
            if command.fail {
                return Err(DomainError::MissingHandler("Note"));
            }
            Ok(command.count)
        }
    }

    #[derive(Default)]
    struct CollectingDispatcher {
        seen: Mutex<Vec<u32>>,
        fail_on: Option<u32>,
    }

    #[async_trait]
    impl EventDispatcher for CollectingDispatcher {
        async fn dispatch(&self, event: &RecordedEvent) -> events::Result<()> {
            let noted: Noted = event.decode()?;
            if self.fail_on == Some(noted.0) {
                return Err(EventError::Subscriber {
                    subscriber: "collector",
                    event_type: event.event_type.clone(),
                    reason: "refused".to_string(),
                });
            }
            self.seen.lock().unwrap().push(noted.0);
            Ok(())
        }
    }

    fn bus_with(dispatcher: Arc<CollectingDispatcher>) -> CommandBus {
        CommandBus::builder()
            .handler::<Note, _>(NoteHandler)
            .middleware(Arc::new(TracingMiddleware))
            .middleware(Arc::new(ReleaseRecordedEventsMiddleware::new(dispatcher)))
            .build()
    }

    #[tokio::test]
    async fn releases_events_in_order_after_success() {
        let dispatcher = Arc::new(CollectingDispatcher::default());
        let bus = bus_with(dispatcher.clone());

        let output = bus.dispatch(Note { count: 3, fail: false }).await.unwrap();

        assert_eq!(output, 3);
        assert_eq!(*dispatcher.seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn erases_events_when_the_handler_fails() {
        let dispatcher = Arc::new(CollectingDispatcher::default());
        let bus = bus_with(dispatcher.clone());

        let result = bus.dispatch(Note { count: 2, fail: true }).await;

        assert!(result.is_err());
        assert!(dispatcher.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_failure_does_not_fail_the_command() {
        let dispatcher = Arc::new(CollectingDispatcher {
            fail_on: Some(1),
            ..Default::default()
        });
        let bus = bus_with(dispatcher.clone());

        let output = bus.dispatch(Note { count: 3, fail: false }).await.unwrap();

        assert_eq!(output, 3);
        assert_eq!(*dispatcher.seen.lock().unwrap(), vec![0, 2]);
    }
}
