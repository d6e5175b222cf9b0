//! The command bus and its middleware chain.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::command::{Command, CommandHandler, Envelope};
use crate::error::DomainError;

/// Type-erased handler output travelling back up the middleware chain.
pub type Outcome = Box<dyn Any + Send>;

/// Wraps the handling of every command.
///
/// A middleware either forwards the envelope through `next` or
/// short-circuits with an error. Middleware run in registration order, the
/// first registered being the outermost.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Outcome, DomainError>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    handler: &'a dyn ErasedHandler,
}

impl Next<'_> {
    /// Passes the envelope to the next middleware, or to the handler when
    /// the chain is exhausted.
    pub async fn run(self, envelope: Envelope) -> Result<Outcome, DomainError> {
        match self.chain.split_first() {
            Some((middleware, rest)) => {
                let next = Next {
                    chain: rest,
                    handler: self.handler,
                };
                middleware.handle(envelope, next).await
            }
            None => self.handler.handle(envelope).await,
        }
    }
}

#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn handle(&self, envelope: Envelope) -> Result<Outcome, DomainError>;
}

struct TypedHandler<C, H> {
    handler: H,
    _command: PhantomData<fn(C)>,
}

#[async_trait]
impl<C, H> ErasedHandler for TypedHandler<C, H>
where
    C: Command,
    H: CommandHandler<C>,
{
    async fn handle(&self, envelope: Envelope) -> Result<Outcome, DomainError> {
        let recorder = envelope.recorder().clone();
        let command = envelope.into_command::<C>()?;
        let output = self.handler.handle(command, &recorder).await?;
        Ok(Box::new(output))
    }
}

/// Routes each command to its single registered handler through the
/// middleware chain.
pub struct CommandBus {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl CommandBus {
    pub fn builder() -> CommandBusBuilder {
        CommandBusBuilder::default()
    }

    /// Dispatches a command and returns what its handler produced.
    ///
    /// Every dispatch gets its own envelope and event recorder, so
    /// concurrent dispatches never see each other's events.
    pub async fn dispatch<C: Command>(&self, command: C) -> Result<C::Output, DomainError> {
        let handler = self
            .handlers
            .get(&TypeId::of::<C>())
            .ok_or(DomainError::MissingHandler(C::NAME))?;

        let next = Next {
            chain: &self.middleware,
            handler: handler.as_ref(),
        };
        let outcome = next.run(Envelope::new(command)).await?;

        outcome
            .downcast::<C::Output>()
            .map(|output| *output)
            .map_err(|_| DomainError::UnexpectedOutput(C::NAME))
    }

    /// Returns true if a handler is registered for `C`.
    pub fn handles<C: Command>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<C>())
    }
}

impl std::fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBus")
            .field("handlers", &self.handlers.len())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// Builder for [`CommandBus`].
#[derive(Default)]
pub struct CommandBusBuilder {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl CommandBusBuilder {
    /// Registers the handler for `C`, replacing any earlier registration.
    pub fn handler<C, H>(mut self, handler: H) -> Self
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let erased = TypedHandler {
            handler,
            _command: PhantomData::<fn(C)>,
        };
        if self
            .handlers
            .insert(TypeId::of::<C>(), Arc::new(erased))
            .is_some()
        {
            tracing::warn!(command = C::NAME, "command handler replaced");
        }
        self
    }

    /// Appends a middleware to the chain.
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn build(self) -> CommandBus {
        CommandBus {
            handlers: self.handlers,
            middleware: self.middleware,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use events::EventRecorder;

    use super::*;

    struct Shout(String);

    impl Command for Shout {
        const NAME: &'static str = "Shout";
        type Output = String;
    }

    struct Whisper;

    impl Command for Whisper {
        const NAME: &'static str = "Whisper";
        type Output = ();
    }

    struct ShoutHandler;

    #[async_trait]
    impl CommandHandler<Shout> for ShoutHandler {
        async fn handle(&self, command: Shout, _: &EventRecorder) -> Result<String, DomainError> {
            Ok(command.0.to_uppercase())
        }
    }

    struct Trail {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Trail {
        async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Outcome, DomainError> {
            self.log.lock().unwrap().push(format!("{} in", self.label));
            let outcome = next.run(envelope).await;
            self.log.lock().unwrap().push(format!("{} out", self.label));
            outcome
        }
    }

    struct Gate;

    #[async_trait]
    impl Middleware for Gate {
        async fn handle(&self, envelope: Envelope, _: Next<'_>) -> Result<Outcome, DomainError> {
            Err(DomainError::MissingHandler(envelope.command_name()))
        }
    }

    #[tokio::test]
    async fn dispatch_returns_handler_output() {
        let bus = CommandBus::builder().handler::<Shout, _>(ShoutHandler).build();

        let output = bus.dispatch(Shout("hello".to_string())).await.unwrap();

        assert_eq!(output, "HELLO");
        assert!(bus.handles::<Shout>());
        assert!(!bus.handles::<Whisper>());
    }

    #[tokio::test]
    async fn dispatch_without_handler_fails() {
        let bus = CommandBus::builder().handler::<Shout, _>(ShoutHandler).build();

        let err = bus.dispatch(Whisper).await.unwrap_err();

        assert!(matches!(err, DomainError::MissingHandler("Whisper")));
    }

    #[tokio::test]
    async fn middleware_runs_outermost_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = CommandBus::builder()
            .handler::<Shout, _>(ShoutHandler)
            .middleware(Arc::new(Trail {
                label: "outer",
                log: log.clone(),
            }))
            .middleware(Arc::new(Trail {
                label: "inner",
                log: log.clone(),
            }))
            .build();

        bus.dispatch(Shout("x".to_string())).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer in", "inner in", "inner out", "outer out"]
        );
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let bus = CommandBus::builder()
            .handler::<Shout, _>(ShoutHandler)
            .middleware(Arc::new(Gate))
            .build();

        let err = bus.dispatch(Shout("x".to_string())).await.unwrap_err();

        assert!(matches!(err, DomainError::MissingHandler("Shout")));
    }
}
