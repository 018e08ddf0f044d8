//! In-Process Transport
//!
//! Direct channel-based frame passing for tests and embedded use. The far
//! end of the pair plays the server: it receives the frames the client
//! sends and pushes the frames the client will receive.
//!
//! # Usage
//!
//! ```ignore
//! let (transport, outbound_rx, inbound_tx) = InProcessTransport::new_pair();
//!
//! // Drive the server side through outbound_rx and inbound_tx
//! // Hand transport to the client
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::traits::{ServerTransport, TransportError};

/// In-process transport using tokio channels
///
/// Zero-serialization frame passing when both ends live in the same
/// process. Dropping the far end's sender looks like a connection close
/// to the client.
pub struct InProcessTransport {
    /// Channel carrying frames to the server side
    outbound_tx: mpsc::Sender<String>,
    /// Channel carrying frames from the server side
    inbound_rx: mpsc::Receiver<String>,
    /// Connection state
    connected: Arc<AtomicBool>,
}

impl InProcessTransport {
    /// Create a new in-process transport pair
    ///
    /// Returns:
    /// - `InProcessTransport`: hand this to the client
    /// - `mpsc::Receiver<String>`: the server side receives sent frames here
    /// - `mpsc::Sender<String>`: the server side pushes frames here
    #[must_use]
    pub fn new_pair() -> (Self, mpsc::Receiver<String>, mpsc::Sender<String>) {
        Self::new_pair_with_capacity(100)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>, mpsc::Sender<String>) {
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);

        let transport = Self {
            outbound_tx,
            inbound_rx,
            connected: Arc::new(AtomicBool::new(true)),
        };

        (transport, outbound_rx, inbound_tx)
    }
}

#[async_trait]
impl ServerTransport for InProcessTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        self.outbound_tx
            .send(frame)
            .await
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        match self.inbound_rx.recv().await {
            Some(frame) => Ok(frame),
            None => {
                self.connected.store(false, Ordering::SeqCst);
                Err(TransportError::ConnectionClosed)
            }
        }
    }

    fn try_recv(&mut self) -> Option<String> {
        match self.inbound_rx.try_recv() {
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
