pub mod dispatcher;
pub mod error;
pub mod event;
pub mod recorder;

pub use dispatcher::{EventDispatcher, EventSubscriber, SubscriberRegistry};
pub use error::{EventError, Result};
pub use event::{DomainEvent, EventId, RecordedEvent, RecordedEventBuilder};
pub use recorder::EventRecorder;
