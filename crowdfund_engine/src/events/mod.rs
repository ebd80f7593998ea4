//! Contribution lifecycle events.
//!
//! Subscribers register [`EventHooks`] before the server starts. The engine publishes to every matching hook through
//! [`EventProducers`]. Each hook call runs on its own task, so a slow hook does not stall its handler loop.
//!
//! Publishing is a send on a bounded channel (see [`EventHandlers::new`]). When a handler's buffer is full, the
//! publisher waits until the handler has taken an event off the queue.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
