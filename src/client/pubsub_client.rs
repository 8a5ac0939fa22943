use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, Sender, error::TrySendError};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::utils::{GatewayError, Result};

/// Opaque identity of one channel, minted when the channel is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Frames a client may have queued before it counts as stalled.
pub const SEND_QUEUE_CAPACITY: usize = 16;

/// A connected WebSocket client.
///
/// Holds the sending side of the bounded per-channel queue drained by the
/// socket writer task. A send fails once that task is gone or once the queue
/// is full, which is how the live loop notices a dead or stalled channel.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ConnectionId,
    pub sender: Sender<WsMessage>,
    shutdown: Arc<Notify>,
}

impl Client {
    pub fn new(sender: Sender<WsMessage>) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// A client plus the receiving end of a queue of [`SEND_QUEUE_CAPACITY`].
    pub fn channel() -> (Self, mpsc::Receiver<WsMessage>) {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
        (Self::new(tx), rx)
    }

    /// Serialize `payload` and queue it as a text frame.
    pub fn send_json<T: Serialize>(&self, payload: &T) -> Result<()> {
        let text = serde_json::to_string(payload)?;
        self.sender
            .try_send(WsMessage::text(text))
            .map_err(|e| match e {
                TrySendError::Full(_) => GatewayError::Backlogged,
                TrySendError::Closed(_) => GatewayError::ChannelClosed,
            })
    }

    /// Queue a close frame. The writer forwards it and shuts the channel.
    ///
    /// If the queue is full the writer is told to drop the socket instead.
    pub fn close(&self) {
        if let Err(TrySendError::Full(_)) = self.sender.try_send(WsMessage::Close(None)) {
            self.shutdown.notify_one();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Resolves once the writer side of the channel has gone away.
    pub async fn closed(&self) {
        self.sender.closed().await;
    }

    /// Signal the writer waits on besides its queue.
    pub fn shutdown_signal(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }
}
