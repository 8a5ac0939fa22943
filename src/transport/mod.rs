//! The `transport` module is responsible for handling network communication
//! with clients over WebSockets.
//!
//! It defines the inbound message format, the subscription request handler
//! and the WebSocket server that feeds parsed requests to it.

pub mod handler;
pub mod message;
pub mod websocket;

pub use handler::handle_request;
pub use message::{ClientRequest, Command};
pub use websocket::{ServerState, serve, start_websocket_server};
