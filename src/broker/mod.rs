//! Subscription state shared by the request handler and the live loop.
//!
//! `Registry` owns every map: which connection watches which boat, which
//! connections hang off each boat key, and how many references keep each key
//! on the simulator poll list. Callers hold it behind one lock
//! ([`SharedRegistry`]) and only reach the maps through its methods.

pub mod engine;
pub mod key;
pub mod message;
pub mod topic;
pub mod tracker;

pub use engine::{Registry, RegistryStats, SharedRegistry, Subscription};
pub use key::BoatKey;
pub use message::{BoatData, GroupMember, GroupPayload};
