//! WebSocket Transport
//!
//! The production path to the server. One handshake per `connect` call,
//! then two pump tasks: a writer draining the outbound channel into the
//! socket, and a reader forwarding text frames into the inbound channel.
//! The split keeps `send` usable from `&self` while the reader owns the
//! receive half.
//!
//! Non-text frames are ignored; ping/pong is handled by the protocol
//! layer underneath.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::traits::{ConnectionId, ServerTransport, TransportError};

/// WebSocket transport for the conversation stream
pub struct WebSocketTransport {
    /// Endpoint URL, e.g. `ws://127.0.0.1:8000/ws-chat`
    url: String,
    /// Identifier of the current connection attempt
    conn_id: ConnectionId,
    /// Connection state, shared with the pump tasks
    connected: Arc<AtomicBool>,
    /// Outbound frames, drained by the writer task
    outbound_tx: Option<mpsc::Sender<String>>,
    /// Inbound frames, fed by the reader task
    inbound_rx: Option<mpsc::Receiver<String>>,
    /// Pump tasks for the current connection
    tasks: Vec<JoinHandle<()>>,
}

impl WebSocketTransport {
    /// Create a transport for the given endpoint (does not connect)
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn_id: ConnectionId::new(),
            connected: Arc::new(AtomicBool::new(false)),
            outbound_tx: None,
            inbound_rx: None,
            tasks: Vec::new(),
        }
    }

    /// The endpoint this transport connects to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Identifier of the current connection attempt
    #[must_use]
    pub fn connection_id(&self) -> &ConnectionId {
        &self.conn_id
    }

    fn shutdown_tasks(&mut self) {
        self.outbound_tx = None;
        self.inbound_rx = None;
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[async_trait]
impl ServerTransport for WebSocketTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        // Tear down any previous session before handshaking again
        self.shutdown_tasks();

        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        self.conn_id = ConnectionId::new();
        tracing::info!(
            conn = %self.conn_id,
            url = %self.url,
            "Connected to conversation stream"
        );

        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(64);
        let (inbound_tx, inbound_rx) = mpsc::channel::<String>(256);

        self.connected.store(true, Ordering::SeqCst);

        let writer_connected = Arc::clone(&self.connected);
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(e) = sink.send(Message::Text(frame)).await {
                    tracing::warn!(error = %e, "Websocket send failed");
                    writer_connected.store(false, Ordering::SeqCst);
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_connected = Arc::clone(&self.connected);
        let conn = self.conn_id.clone();
        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!(conn = %conn, "Server closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(conn = %conn, error = %e, "Websocket receive failed");
                        break;
                    }
                }
            }
            reader_connected.store(false, Ordering::SeqCst);
        });

        self.outbound_tx = Some(outbound_tx);
        self.inbound_rx = Some(inbound_rx);
        self.tasks = vec![writer, reader];
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        self.shutdown_tasks();
        Ok(())
    }

    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        let Some(tx) = self.outbound_tx.as_ref() else {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        };

        tx.send(frame)
            .await
            .map_err(|_| TransportError::SendFailed("Writer task gone".to_string()))
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        let Some(rx) = self.inbound_rx.as_mut() else {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        };

        match rx.recv().await {
            Some(frame) => Ok(frame),
            None => {
                self.connected.store(false, Ordering::SeqCst);
                Err(TransportError::ConnectionClosed)
            }
        }
    }

    fn try_recv(&mut self) -> Option<String> {
        let rx = self.inbound_rx.as_mut()?;
        match rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
