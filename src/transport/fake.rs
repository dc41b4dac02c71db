//! Scripted in-memory transport for driver tests.
//!
//! Each connect attempt consumes one script entry: `Accept` hands the driver
//! a link whose remote side is controlled by a [`FakeConn`], `Refuse` (and an
//! empty script queue) fails the attempt. Connect instants are recorded on
//! tokio's clock so tests under `start_paused` can assert backoff spacing.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::protocol::Frame;

use super::{Transport, TransportLink};

// ============================================================================
// Types
// ============================================================================

/// Signal injected by the test into a fake link.
enum Signal {
    Text(String),
    Error(String),
}

/// One scripted outcome for a connect attempt.
enum Script {
    Accept {
        sent: Arc<Mutex<Vec<String>>>,
        inbound: mpsc::UnboundedReceiver<Signal>,
    },
    Refuse,
}

// ============================================================================
// FakeTransport
// ============================================================================

/// Scripted [`Transport`] for tests.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    inner: Arc<FakeInner>,
}

#[derive(Default)]
struct FakeInner {
    scripts: Mutex<VecDeque<Script>>,
    attempts: Mutex<Vec<Instant>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues an accepted connection; returns its remote-side handle.
    pub(crate) fn expect_accept(&self) -> Arc<FakeConn> {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::unbounded_channel();

        self.inner.scripts.lock().push_back(Script::Accept {
            sent: Arc::clone(&sent),
            inbound: rx,
        });

        Arc::new(FakeConn {
            sent,
            inbound: Mutex::new(Some(tx)),
        })
    }

    /// Queues a refused connection attempt.
    ///
    /// An empty script queue also refuses, so this is only needed to order
    /// a refusal before queued accepts.
    pub(crate) fn expect_refuse(&self) {
        self.inner.scripts.lock().push_back(Script::Refuse);
    }

    /// Instants at which connect attempts were made.
    pub(crate) fn attempt_times(&self) -> Vec<Instant> {
        self.inner.attempts.lock().clone()
    }

    pub(crate) fn attempt_count(&self) -> usize {
        self.inner.attempts.lock().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&self, _url: &str) -> Result<Box<dyn TransportLink>> {
        self.inner.attempts.lock().push(Instant::now());

        match self.inner.scripts.lock().pop_front() {
            Some(Script::Accept { sent, inbound }) => Ok(Box::new(FakeLink {
                sent,
                inbound,
                closed: false,
            })),
            Some(Script::Refuse) | None => Err(Error::connection("connection refused")),
        }
    }
}

// ============================================================================
// FakeConn
// ============================================================================

/// Test-side handle to one accepted fake connection.
pub(crate) struct FakeConn {
    sent: Arc<Mutex<Vec<String>>>,
    inbound: Mutex<Option<mpsc::UnboundedSender<Signal>>>,
}

impl FakeConn {
    /// Raw frames the driver sent over this connection.
    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Decoded frames the driver sent over this connection.
    pub(crate) fn sent_frames(&self) -> Vec<Frame> {
        self.sent()
            .iter()
            .map(|text| Frame::decode(text).expect("driver sent valid frame"))
            .collect()
    }

    pub(crate) fn clear_sent(&self) {
        self.sent.lock().clear();
    }

    /// Delivers raw inbound text to the driver.
    pub(crate) fn push_text(&self, text: impl Into<String>) {
        if let Some(tx) = self.inbound.lock().as_ref() {
            let _ = tx.send(Signal::Text(text.into()));
        }
    }

    /// Delivers an inbound frame to the driver.
    pub(crate) fn push_frame(&self, frame: &Frame) {
        self.push_text(frame.encode().expect("frame encodes"));
    }

    /// Injects a transport error, which the driver treats as fatal.
    pub(crate) fn push_error(&self, message: impl Into<String>) {
        if let Some(tx) = self.inbound.lock().as_ref() {
            let _ = tx.send(Signal::Error(message.into()));
        }
    }

    /// Closes the connection from the remote side.
    pub(crate) fn close(&self) {
        *self.inbound.lock() = None;
    }
}

// ============================================================================
// FakeLink
// ============================================================================

struct FakeLink {
    sent: Arc<Mutex<Vec<String>>>,
    inbound: mpsc::UnboundedReceiver<Signal>,
    closed: bool,
}

#[async_trait]
impl TransportLink for FakeLink {
    async fn send(&mut self, text: String) -> Result<()> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }
        self.sent.lock().push(text);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        match self.inbound.recv().await {
            Some(Signal::Text(text)) => Some(Ok(text)),
            Some(Signal::Error(message)) => Some(Err(Error::connection(message))),
            None => None,
        }
    }

    async fn close(&mut self) {
        self.closed = true;
        self.inbound.close();
    }
}
