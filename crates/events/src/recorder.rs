use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{DomainEvent, RecordedEvent, Result};

/// Buffers the domain events raised while one command is being handled.
///
/// Handlers only ever record. Whoever owns the unit of work decides whether
/// the buffer is released to a dispatcher or erased. Clones share the same
/// buffer, so a middleware can keep a handle while the handler records
/// through another.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a typed domain event.
    pub fn record<E: DomainEvent>(&self, event: &E) -> Result<()> {
        let recorded = RecordedEvent::from_event(event)?;
        self.record_raw(recorded);
        Ok(())
    }

    /// Records an already captured event.
    pub fn record_raw(&self, event: RecordedEvent) {
        tracing::trace!(event_type = %event.event_type, "event recorded");
        self.buffer().push(event);
    }

    /// Takes every buffered event, oldest first, leaving the buffer empty.
    pub fn release_events(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.buffer())
    }

    /// Drops every buffered event.
    pub fn erase_events(&self) {
        let mut events = self.buffer();
        if !events.is_empty() {
            tracing::debug!(discarded = events.len(), "recorded events erased");
        }
        events.clear();
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn buffer(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
