//! The `client` module defines the handle the registry and the live loop use
//! to reach one WebSocket channel.

pub mod pubsub_client;
pub use pubsub_client::{Client, ConnectionId, SEND_QUEUE_CAPACITY};
