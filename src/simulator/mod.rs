//! The `simulator` module talks to the backend boat simulator over its
//! line-oriented TCP protocol.
//!
//! `protocol` holds the request builders and line parsers; `client` owns the
//! socket handling, timeouts and the concurrent write/read exchange.

pub mod client;
pub mod protocol;

pub use client::SimulatorClient;

#[cfg(test)]
mod tests;
