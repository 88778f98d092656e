//! The `bus` module is the core of the dispatcher.
//!
//! It manages the registry of topics, the handlers subscribed to each topic,
//! and the synchronous delivery of published arguments to those handlers.

pub mod engine;
pub mod message;
pub mod topic;

pub use engine::{Bus, Publisher, Subscriber};
pub use message::{Message, Operation};
pub use topic::{Arg, DeliveryMode, Handler, Topic, arg};
