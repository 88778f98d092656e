//! # TopicBus
//!
//! `topicbus` is a minimalist, in-process publish/subscribe dispatcher built
//! with Rust. Callers register callback handlers against named topics, and
//! publishing to a topic invokes every registered handler synchronously, in
//! registration order. It is a building block for decoupling producers and
//! consumers of events inside a single process: there is no network, no
//! persistence, and no cross-process delivery.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `bus`: The central component that manages topics, handlers, and delivery.
//! - `config`: Handles loading and managing dispatcher configuration.
//! - `utils`: Contains shared utilities, such as error types and logging setup.

pub mod bus;
pub mod config;
pub mod utils;

pub use bus::{Arg, Bus, DeliveryMode, Handler, Message, Operation, Publisher, Subscriber, arg};
pub use utils::error::{BusError, HandlerError};

#[cfg(test)]
mod tests;
