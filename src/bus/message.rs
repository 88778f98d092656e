use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bus::topic::Arg;

/// Names one of the dispatcher's operations.
///
/// Used by [`Message`] to describe a bus call as data. The dispatcher
/// itself never routes on this; it exists for callers who want to queue or
/// dispatch operations generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Subscribe,
    SubscribeOnce,
    SubscribeOnceEach,
    Publish,
    TryPublish,
    Unsubscribe,
    UnsubscribeAll,
    CloseTopic,
    Shutdown,
}

impl Operation {
    /// Whether this operation registers a handler and therefore needs a
    /// callback carried alongside the envelope.
    pub fn requires_handler(&self) -> bool {
        matches!(
            self,
            Operation::Subscribe | Operation::SubscribeOnce | Operation::SubscribeOnceEach
        )
    }
}

/// A command-style envelope for a bus operation.
///
/// It contains the operation to perform, the topic to perform it on, and
/// the arguments to pass along. The bus does not consume this type; it is
/// an extension point for callers that route operations through their own
/// queue or command layer. Subscription operations additionally need a
/// handler, which an envelope cannot carry (see
/// [`Operation::requires_handler`]).
#[derive(Clone)]
pub struct Message {
    pub topic: String,
    pub operation: Operation,
    pub args: Vec<Arg>,
}

impl Message {
    /// Creates a new envelope for `operation` on `topic`.
    pub fn new(topic: impl Into<String>, operation: Operation, args: Vec<Arg>) -> Self {
        Self {
            topic: topic.into(),
            operation,
            args,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("topic", &self.topic)
            .field("operation", &self.operation)
            .field("args", &self.args.len())
            .finish()
    }
}
