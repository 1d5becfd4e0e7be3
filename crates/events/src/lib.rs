//! `sookari-events` — event trait + pub/sub mechanics for observable stores.
//!
//! UI surfaces (tab badge, cart screen, product action buttons) observe domain
//! stores through this crate: a store publishes one message per committed
//! mutation, each subscriber gets its own copy, and nobody polls.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
