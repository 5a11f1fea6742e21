//! Mock transport for deterministic testing of the protocol engine.
//!
//! The kv4p protocol is not request/response: commands are fire-and-forget
//! frames, and the radio pushes an unsolicited byte stream (handshake text
//! during startup, audio payload afterwards). The mock therefore records
//! everything sent and exposes an injection point for inbound data instead
//! of an expectation queue.
//!
//! # Example
//!
//! ```
//! use kv4p_test_harness::MockTransport;
//!
//! let mock = MockTransport::new();
//! let handle = mock.handle();
//!
//! // Move `mock` into the code under test, then:
//! handle.push_rx(b"VERSION00000001");
//! // ... later assert on handle.sent_frames()
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use kv4p_core::error::{Error, Result};
use kv4p_core::transport::Transport;

#[derive(Debug, Default)]
struct Shared {
    /// Every `send()` call, one entry per frame.
    sent: Vec<Vec<u8>>,
    /// Bytes queued for delivery to `receive()`.
    rx: VecDeque<u8>,
    connected: bool,
}

/// A mock [`Transport`] for testing without hardware.
///
/// Created via [`MockTransport::new`]; grab a [`MockHandle`] with
/// [`handle()`](MockTransport::handle) before moving the transport into
/// the code under test.
#[derive(Debug)]
pub struct MockTransport {
    shared: Arc<Mutex<Shared>>,
    notify: Arc<Notify>,
}

/// Cloneable handle to a [`MockTransport`] that has been moved into the
/// code under test.
///
/// Lets the test inject inbound bytes ([`push_rx`](MockHandle::push_rx)),
/// inspect sent frames, and simulate a dropped connection.
#[derive(Debug, Clone)]
pub struct MockHandle {
    shared: Arc<Mutex<Shared>>,
    notify: Arc<Notify>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            shared: Arc::new(Mutex::new(Shared {
                sent: Vec::new(),
                rx: VecDeque::new(),
                connected: true,
            })),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Return a handle for controlling this transport after it has been
    /// handed to the code under test.
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            shared: Arc::clone(&self.shared),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHandle {
    /// Queue bytes for delivery to the next `receive()` call(s).
    ///
    /// Call repeatedly with small slices to simulate fragmentation; the
    /// transport delivers whatever is queued, up to the receive buffer
    /// size, per call.
    pub fn push_rx(&self, data: &[u8]) {
        let mut shared = self.shared.lock().unwrap();
        shared.rx.extend(data.iter().copied());
        drop(shared);
        self.notify.notify_one();
    }

    /// All frames sent through this transport so far, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.shared.lock().unwrap().sent.clone()
    }

    /// Number of frames sent so far.
    pub fn sent_count(&self) -> usize {
        self.shared.lock().unwrap().sent.len()
    }

    /// Discard the record of sent frames.
    pub fn clear_sent(&self) {
        self.shared.lock().unwrap().sent.clear();
    }

    /// Set the connected state. When `false`, `send()` and `receive()`
    /// return [`Error::NotConnected`]; a pending `receive()` is woken.
    pub fn set_connected(&self, connected: bool) {
        self.shared.lock().unwrap().connected = connected;
        self.notify.notify_one();
    }

    /// Whether the transport still reports itself connected.
    pub fn is_connected(&self) -> bool {
        self.shared.lock().unwrap().connected
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut shared = self.shared.lock().unwrap();
        if !shared.connected {
            return Err(Error::NotConnected);
        }
        shared.sent.push(data.to_vec());
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            {
                let mut shared = self.shared.lock().unwrap();
                if !shared.connected {
                    return Err(Error::NotConnected);
                }
                if !shared.rx.is_empty() {
                    let n = buf.len().min(shared.rx.len());
                    for slot in buf[..n].iter_mut() {
                        *slot = shared.rx.pop_front().unwrap();
                    }
                    return Ok(n);
                }
            }

            // No data yet: wait for a push_rx / set_connected wakeup or
            // the deadline, whichever comes first. notify_one stores a
            // permit, so a push between the unlock above and this await
            // is not lost.
            if tokio::time::timeout_at(deadline, self.notify.notified())
                .await
                .is_err()
            {
                return Err(Error::Timeout);
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.shared.lock().unwrap().connected = false;
        self.notify.notify_one();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.lock().unwrap().connected
    }
}
