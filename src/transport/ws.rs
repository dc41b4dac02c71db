//! WebSocket transport implementation.
//!
//! Implements the [`Transport`] seam over `tokio-tungstenite`. Text frames
//! carry the protocol; Binary, Ping, and Pong messages are ignored. A Close
//! frame or stream end is a clean close, a stream error is a transport
//! failure.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use crate::error::{Error, Result};

use super::{Transport, TransportLink};

// ============================================================================
// WsTransport
// ============================================================================

/// WebSocket [`Transport`] over `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl WsTransport {
    /// Creates the WebSocket transport.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn TransportLink>> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| Error::connection(e.to_string()))?;

        debug!(url, "WebSocket connection established");

        Ok(Box::new(WsLink { stream }))
    }
}

// ============================================================================
// WsLink
// ============================================================================

/// One live WebSocket connection.
struct WsLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl TransportLink for WsLink {
    async fn send(&mut self, text: String) -> Result<()> {
        trace!(bytes = text.len(), "WebSocket text frame sent");
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.to_string())),

                Some(Ok(Message::Close(_))) => {
                    debug!("WebSocket closed by remote");
                    return None;
                }

                // Ignore Binary, Ping, Pong, Frame
                Some(Ok(_)) => {}

                Some(Err(e)) => return Some(Err(Error::WebSocket(e))),

                None => {
                    debug!("WebSocket stream ended");
                    return None;
                }
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
