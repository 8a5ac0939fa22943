//! WebSocket transport
//!
//! Accepts connections on the configured upgrade paths and wires each one to
//! the registry:
//! - a writer task drains the per-connection queue into the socket sink
//! - the reader parses `{"cmd", "key"}` frames and hands them to
//!   [`handle_request`]
//!
//! The reader never removes a connection from the registry. A connection
//! that goes away is noticed by the live loop when its next send fails.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tracing::{debug, info, warn};
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::SharedRegistry;
use crate::client::Client;
use crate::simulator::SimulatorClient;
use crate::transport::handler::handle_request;
use crate::transport::message::ClientRequest;
use crate::utils::Result;

/// How long a rejected connection's writer may take to deliver the close.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Everything a connection task needs.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub registry: SharedRegistry,
    pub simulator: SimulatorClient,
    pub paths: Arc<Vec<String>>,
}

impl ServerState {
    pub fn new(registry: SharedRegistry, simulator: SimulatorClient, paths: Vec<String>) -> Self {
        Self {
            registry,
            simulator,
            paths: Arc::new(paths),
        }
    }
}

pub async fn start_websocket_server(addr: &str, state: ServerState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, paths = ?state.paths, "WebSocket server listening");
    serve(listener, state).await;
    Ok(())
}

/// Accept loop on an already bound listener.
pub async fn serve(listener: TcpListener, state: ServerState) {
    while let Ok((stream, peer)) = listener.accept().await {
        spawn(handle_connection(stream, peer, state.clone()));
    }
    warn!("WebSocket accept loop ended");
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: ServerState) {
    let paths = state.paths.clone();
    let check_path = move |req: &Request, resp: Response| {
        if paths.iter().any(|p| p == req.uri().path()) {
            Ok(resp)
        } else {
            let mut refusal = ErrorResponse::new(Some("not found".to_string()));
            *refusal.status_mut() = StatusCode::NOT_FOUND;
            Err(refusal)
        }
    };

    let ws_stream = match accept_hdr_async(stream, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!(peer = %peer, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (client, mut rx) = Client::channel();
    let conn = client.id;
    debug!(conn = %conn, peer = %peer, "connection accepted");

    let shutdown = client.shutdown_signal();
    let mut writer = spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => msg,
                _ = shutdown.notified() => None,
            };
            let Some(msg) = msg else { break };

            let closing = matches!(msg, WsMessage::Close(_));
            let sent = tokio::select! {
                sent = ws_sender.send(msg) => sent,
                _ = shutdown.notified() => {
                    debug!(conn = %conn, "dropping stalled client");
                    break;
                }
            };
            if let Err(e) = sent {
                debug!(conn = %conn, error = %e, "send to client failed");
                break;
            }
            if closing {
                break;
            }
        }
        debug!(conn = %conn, "send loop closed");
    });

    let mut rejected = false;
    loop {
        let next = tokio::select! {
            next = ws_receiver.next() => next,
            _ = client.closed() => break,
        };

        match next {
            Some(Ok(WsMessage::Text(text))) => {
                match serde_json::from_str::<ClientRequest>(text.as_str()) {
                    Ok(request) => {
                        // the handler has already logged and queued the close
                        if handle_request(&state.registry, &state.simulator, &client, request)
                            .await
                            .is_err()
                        {
                            rejected = true;
                            break;
                        }
                    }
                    Err(e) => warn!(conn = %conn, error = %e, "ignoring unparseable frame"),
                }
            }
            Some(Ok(WsMessage::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                debug!(conn = %conn, error = %e, "read from client failed");
                break;
            }
        }
    }

    // A rejected connection gets a moment to receive its close frame.
    // Otherwise dropping the writer's queue makes the next broadcast to this
    // connection fail, which is what unsubscribes it.
    if !rejected || timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        writer.abort();
    }
    debug!(conn = %conn, "connection reader finished");
}
