//! `academia-events` — in-process publish/subscribe mechanics.
//!
//! State changes that several parts of the client must observe (most notably
//! the authenticated identity) are broadcast through a [`ReplayBus`]: every
//! subscriber receives the latest value immediately, then every later value,
//! in one global order.

pub mod bus;
pub mod replay_bus;

pub use bus::{EventBus, Subscription};
pub use replay_bus::{ReplayBus, ReplayBusError};
