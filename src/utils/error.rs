//! Error types shared across the gateway.
//!
//! Nothing in here is process-fatal: the live loop logs these and moves on to
//! its next cycle, and the request handler logs them and closes the one
//! connection involved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Boat key is not 32 lowercase hex characters.
    #[error("invalid boat key: {0:?}")]
    InvalidBoatKey(String),

    /// A second subscribe arrived on a channel that already has one.
    #[error("connection {0} is already subscribed")]
    AlreadySubscribed(String),

    #[error("simulator I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out connecting to simulator")]
    ConnectTimeout,

    #[error("simulator exchange exceeded its deadline")]
    ExchangeTimeout,

    /// The simulator answered with `error`, closed early, or sent a line we
    /// could not make sense of.
    #[error("simulator protocol error: {0}")]
    Protocol(String),

    /// Group roster header carried a status other than `ok`.
    #[error("group roster rejected for {key}: {status}")]
    RosterRejected { key: String, status: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The writer side of a client channel is gone.
    #[error("client channel closed")]
    ChannelClosed,

    /// The client stopped reading and its outbound queue is full.
    #[error("client send queue is full")]
    Backlogged,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
