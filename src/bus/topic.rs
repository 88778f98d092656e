use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::utils::error::{BusError, HandlerError};

/// A single argument passed from a publisher to every handler on a topic.
///
/// Arguments are dynamically typed; a handler recovers the concrete type
/// with [`Any::downcast_ref`]. Mismatches between what a publisher sends and
/// what a subscriber expects are a caller responsibility and are not
/// validated by the dispatcher.
pub type Arg = Arc<dyn Any + Send + Sync>;

/// Wraps a value as a publish argument.
pub fn arg<T: Any + Send + Sync>(value: T) -> Arg {
    Arc::new(value)
}

/// A subscribed callback.
///
/// Handlers receive the exact argument list passed to the publish call and
/// may report a failure. A reported error is only observable through
/// [`Bus::try_publish`](crate::Bus::try_publish); best-effort publishing
/// logs it and moves on to the next handler.
pub type Handler = Box<dyn FnMut(&[Arg]) -> Result<(), HandlerError> + Send + 'static>;

/// Policy governing handler retention across publish calls.
///
/// The mode applies to the whole topic and is overwritten by every
/// subscribe call, so the last subscriber decides the lifetime of every
/// handler currently on the topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Handlers remain registered across publish calls.
    #[default]
    Persistent,
    /// The entire handler set is cleared once the topic's next publish
    /// call finishes, regardless of handler count. The topic stays open.
    OnceTotal,
    /// Each handler is removed from the topic immediately after it is
    /// invoked, so a publish call shrinks the handler set while iterating.
    OnceEach,
}

/// Represents a topic in the dispatcher.
///
/// A topic owns an ordered collection of handlers (order is subscription
/// order, duplicates are distinct entries), the delivery mode for those
/// handlers, and a closed flag. Closing is terminal: a closed topic accepts
/// no further subscriptions or deliveries and is never revived.
pub struct Topic {
    pub name: String,
    handlers: Vec<Handler>,
    mode: DeliveryMode,
    closed: bool,
}

impl Topic {
    /// Creates a new open topic with the given name and no handlers.
    pub fn new(name: &str) -> Self {
        Self::with_capacity(name, 0)
    }

    /// Creates a new open topic, pre-allocating room for `handler_capacity`
    /// handlers.
    pub fn with_capacity(name: &str, handler_capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            handlers: Vec::with_capacity(handler_capacity),
            mode: DeliveryMode::default(),
            closed: false,
        }
    }

    /// Appends a handler and overwrites the topic-wide delivery mode.
    ///
    /// The mode set here applies to every handler on the topic, including
    /// ones registered earlier under a different mode. Subscribing to a
    /// closed topic has no effect.
    pub fn subscribe(&mut self, handler: Handler, mode: DeliveryMode) -> Result<(), BusError> {
        if self.closed {
            return Ok(());
        }
        self.handlers.push(handler);
        self.mode = mode;
        Ok(())
    }

    /// Removes every handler and closes the topic.
    ///
    /// This is a hard stop, not a mode reset: there is no operation that
    /// removes only some handlers while leaving the topic open. Already
    /// closed topics report success.
    pub fn unsubscribe(&mut self) -> Result<(), BusError> {
        if self.closed {
            return Ok(());
        }
        self.handlers.clear();
        self.closed = true;
        Ok(())
    }

    /// Invokes each handler, in subscription order, with `args`.
    ///
    /// With `strict` set, delivery halts at the first handler error and
    /// that error is returned; otherwise errors are logged and delivery
    /// continues to the remaining handlers. Publishing to a closed topic
    /// invokes nothing and reports success.
    pub fn publish(&mut self, args: &[Arg], strict: bool) -> Result<(), BusError> {
        if self.closed {
            return Ok(());
        }
        let mut first_err = None;
        let mut idx = 0;
        while idx < self.handlers.len() {
            let result = (self.handlers[idx])(args);
            if self.mode == DeliveryMode::OnceEach {
                // The fired handler leaves the collection; handlers that
                // have not run yet keep their slots.
                self.handlers.remove(idx);
            } else {
                idx += 1;
            }
            if let Err(err) = result {
                if strict {
                    first_err = Some(err);
                    break;
                }
                debug!(topic = %self.name, error = %err, "handler failed, continuing delivery");
            }
        }
        if self.mode == DeliveryMode::OnceTotal {
            self.handlers.clear();
        }
        match first_err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Removes every handler and closes the topic.
    ///
    /// The state change is identical to [`Topic::unsubscribe`]; callers use
    /// this name to signal that the topic is permanently retired rather
    /// than that they are done listening for now.
    pub fn close(&mut self) -> Result<(), BusError> {
        self.unsubscribe()
    }

    /// Number of handlers currently registered.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the topic has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The delivery mode currently in force for the whole topic.
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .field("mode", &self.mode)
            .field("closed", &self.closed)
            .finish()
    }
}
