use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::bus::topic::{Arg, DeliveryMode, Handler, Topic};
use crate::config::BusSettings;
use crate::utils::error::{BusError, HandlerError};

/// The registration side of the dispatcher.
///
/// Narrow capability trait for callers that only add or remove handlers.
/// The handler argument is pre-boxed so the trait stays object safe; the
/// inherent methods on [`Bus`] accept plain closures.
pub trait Subscriber {
    /// Adds a persistent handler to the topic.
    fn subscribe(&self, topic: &str, handler: Handler) -> Result<(), BusError>;
    /// Adds a handler; the topic's whole handler set is cleared after its
    /// next publish.
    fn subscribe_once(&self, topic: &str, handler: Handler) -> Result<(), BusError>;
    /// Adds a handler; each handler is removed after its own invocation.
    fn subscribe_once_each(&self, topic: &str, handler: Handler) -> Result<(), BusError>;
    /// Removes all handlers from the topic and closes it.
    fn unsubscribe(&self, topic: &str) -> Result<(), BusError>;
    /// Removes all handlers from every topic, closing each one.
    fn unsubscribe_all(&self) -> Result<(), BusError>;
}

/// The delivery side of the dispatcher.
pub trait Publisher {
    /// Invokes every handler on the topic, swallowing handler errors.
    fn publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError>;
    /// Invokes handlers on the topic until the first one fails, and
    /// returns that failure.
    fn try_publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError>;
}

/// The in-process dispatcher that manages topics, handlers, and delivery.
///
/// The bus maintains a mapping of topic names to topics; topics are created
/// lazily on first subscribe and stay in the map once closed so repeated
/// operations on a retired name remain cheap no-ops. All methods take
/// `&self`: the topic map sits behind a read/write lock and every topic
/// behind its own mutex, so a `Bus` can be shared across threads as
/// `Arc<Bus>` with topic creation happening exactly once even when
/// subscribers race on a fresh name.
///
/// Delivery is synchronous on the publishing thread, and the topic lock is
/// held for the whole delivery loop so handler invocation never races with
/// a concurrent subscribe or close. A handler must therefore not call back
/// into the bus for the topic it is being delivered on.
pub struct Bus {
    topics: RwLock<HashMap<String, Arc<Mutex<Topic>>>>,
    handler_capacity: usize,
}

impl Bus {
    /// Creates a new bus with default capacity hints.
    pub fn new() -> Self {
        Self::with_settings(&BusSettings::default())
    }

    /// Creates a new bus using the capacity hints from `settings`.
    pub fn with_settings(settings: &BusSettings) -> Self {
        Self {
            topics: RwLock::new(HashMap::with_capacity(settings.topic_capacity)),
            handler_capacity: settings.handler_capacity,
        }
    }

    /// Adds a persistent handler to the topic, creating the topic if it
    /// does not exist yet.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> Result<(), BusError>
    where
        F: FnMut(&[Arg]) -> Result<(), HandlerError> + Send + 'static,
    {
        self.subscribe_with_mode(topic, Box::new(handler), DeliveryMode::Persistent)
    }

    /// Adds a handler to the topic; after the topic's next publish call the
    /// entire handler set is cleared, regardless of how many handlers were
    /// registered.
    pub fn subscribe_once<F>(&self, topic: &str, handler: F) -> Result<(), BusError>
    where
        F: FnMut(&[Arg]) -> Result<(), HandlerError> + Send + 'static,
    {
        self.subscribe_with_mode(topic, Box::new(handler), DeliveryMode::OnceTotal)
    }

    /// Adds a handler to the topic; each handler is removed right after its
    /// own invocation, so no handler fires more than once.
    pub fn subscribe_once_each<F>(&self, topic: &str, handler: F) -> Result<(), BusError>
    where
        F: FnMut(&[Arg]) -> Result<(), HandlerError> + Send + 'static,
    {
        self.subscribe_with_mode(topic, Box::new(handler), DeliveryMode::OnceEach)
    }

    fn subscribe_with_mode(
        &self,
        topic: &str,
        handler: Handler,
        mode: DeliveryMode,
    ) -> Result<(), BusError> {
        let topic = {
            let mut topics = write_topics(&self.topics);
            topics
                .entry(topic.to_string())
                .or_insert_with(|| {
                    trace!(topic, "registering new topic");
                    Arc::new(Mutex::new(Topic::with_capacity(topic, self.handler_capacity)))
                })
                .clone()
        };
        lock_topic(&topic).subscribe(handler, mode)
    }

    /// Removes all handlers from the topic and closes it. Unsubscribing
    /// from a topic that was never subscribed to is not an error.
    pub fn unsubscribe(&self, topic: &str) -> Result<(), BusError> {
        match self.lookup(topic) {
            Some(topic) => lock_topic(&topic).unsubscribe(),
            None => Ok(()),
        }
    }

    /// Removes all handlers from every known topic, closing each one.
    /// Stops at the first error.
    pub fn unsubscribe_all(&self) -> Result<(), BusError> {
        for topic in self.all_topics() {
            lock_topic(&topic).unsubscribe()?;
        }
        Ok(())
    }

    /// Invokes every handler on the topic with `args`, in subscription
    /// order. Handler errors are swallowed so delivery reaches every
    /// handler; a missing topic is a silent success.
    pub fn publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError> {
        self.publish_args(topic, args, false)
    }

    /// Invokes handlers on the topic with `args` until the first handler
    /// error, which is returned; remaining handlers in that call are not
    /// invoked. A missing topic is a silent success.
    pub fn try_publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError> {
        self.publish_args(topic, args, true)
    }

    fn publish_args(&self, topic: &str, args: &[Arg], strict: bool) -> Result<(), BusError> {
        let Some(topic) = self.lookup(topic) else {
            return Ok(());
        };
        lock_topic(&topic).publish(args, strict)
    }

    /// Closes the topic, removing all its handlers. The state change is the
    /// same as [`Bus::unsubscribe`]; this name signals permanent retirement.
    pub fn close_topic(&self, topic: &str) -> Result<(), BusError> {
        match self.lookup(topic) {
            Some(topic) => lock_topic(&topic).close(),
            None => Ok(()),
        }
    }

    /// Closes every known topic. Stops at the first error.
    pub fn shutdown(&self) -> Result<(), BusError> {
        let topics = self.all_topics();
        debug!(topics = topics.len(), "shutting down bus");
        for topic in topics {
            lock_topic(&topic).close()?;
        }
        Ok(())
    }

    /// Number of topics the bus has ever created, closed ones included.
    pub fn topic_count(&self) -> usize {
        read_topics(&self.topics).len()
    }

    /// Whether the bus has a topic under this name, open or closed.
    pub fn has_topic(&self, topic: &str) -> bool {
        read_topics(&self.topics).contains_key(topic)
    }

    /// Number of handlers currently registered on the topic; zero for a
    /// missing or closed topic.
    pub fn handler_count(&self, topic: &str) -> usize {
        match self.lookup(topic) {
            Some(topic) => lock_topic(&topic).handler_count(),
            None => 0,
        }
    }

    fn lookup(&self, topic: &str) -> Option<Arc<Mutex<Topic>>> {
        read_topics(&self.topics).get(topic).cloned()
    }

    fn all_topics(&self) -> Vec<Arc<Mutex<Topic>>> {
        read_topics(&self.topics).values().cloned().collect()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("topics", &self.topic_count())
            .field("handler_capacity", &self.handler_capacity)
            .finish()
    }
}

impl Subscriber for Bus {
    fn subscribe(&self, topic: &str, handler: Handler) -> Result<(), BusError> {
        self.subscribe_with_mode(topic, handler, DeliveryMode::Persistent)
    }

    fn subscribe_once(&self, topic: &str, handler: Handler) -> Result<(), BusError> {
        self.subscribe_with_mode(topic, handler, DeliveryMode::OnceTotal)
    }

    fn subscribe_once_each(&self, topic: &str, handler: Handler) -> Result<(), BusError> {
        self.subscribe_with_mode(topic, handler, DeliveryMode::OnceEach)
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), BusError> {
        Bus::unsubscribe(self, topic)
    }

    fn unsubscribe_all(&self) -> Result<(), BusError> {
        Bus::unsubscribe_all(self)
    }
}

impl Publisher for Bus {
    fn publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError> {
        Bus::publish(self, topic, args)
    }

    fn try_publish(&self, topic: &str, args: &[Arg]) -> Result<(), BusError> {
        Bus::try_publish(self, topic, args)
    }
}

// A panicking handler poisons its topic lock. The delivery loop leaves the
// topic in a consistent state at every step, so the guard is recovered
// rather than wedging the topic forever.
fn lock_topic(topic: &Mutex<Topic>) -> MutexGuard<'_, Topic> {
    topic.lock().unwrap_or_else(PoisonError::into_inner)
}

type TopicMap = HashMap<String, Arc<Mutex<Topic>>>;

fn read_topics(topics: &RwLock<TopicMap>) -> RwLockReadGuard<'_, TopicMap> {
    topics.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_topics(topics: &RwLock<TopicMap>) -> RwLockWriteGuard<'_, TopicMap> {
    topics.write().unwrap_or_else(PoisonError::into_inner)
}
