//! Bidirectional text channel
//!
//! Sessions exchange JSON text frames over a [`Channel`]. Socket framing,
//! handshakes and reconnection belong to the implementation, not to the
//! session. A closed channel is reported as `None` from
//! [`Channel::recv`], which the session treats as a lost connection.

use childfield_core::{Error, Result};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Ordered, bidirectional text frame transport
pub trait Channel {
    /// Send one frame
    ///
    /// # Errors
    ///
    /// `ChannelClosed` if the peer is gone.
    fn send(&mut self, frame: String) -> Result<()>;

    /// Block until the next frame arrives; `None` once the peer has closed
    /// and every buffered frame has been read
    fn recv(&mut self) -> Option<String>;
}

/// In-memory duplex channel
///
/// Built on unbounded tokio queues. `recv` uses `blocking_recv`, so it must
/// be called from a plain thread, not from inside an async task.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: Option<UnboundedSender<String>>,
    rx: UnboundedReceiver<String>,
}

impl MemoryChannel {
    /// Two connected endpoints
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Some(a_tx),
                rx: a_rx,
            },
            Self {
                tx: Some(b_tx),
                rx: b_rx,
            },
        )
    }

    /// Stop sending; the peer sees the close after draining buffered frames
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// Whether this endpoint can still send
    pub fn is_open(&self) -> bool {
        self.tx.as_ref().map_or(false, |tx| !tx.is_closed())
    }

    /// Next frame if one is already buffered
    pub fn try_recv(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Channel for MemoryChannel {
    fn send(&mut self, frame: String) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(Error::ChannelClosed)?;
        tx.send(frame).map_err(|_| Error::ChannelClosed)
    }

    fn recv(&mut self) -> Option<String> {
        self.rx.blocking_recv()
    }
}
