//! Transport trait for radio communication.
//!
//! The [`Transport`] trait abstracts over the byte channel to the radio.
//! The real implementation is a USB virtual serial port
//! (`kv4p_transport::SerialTransport`); tests use the mock transport from
//! `kv4p-test-harness`.
//!
//! The protocol engine consumes an already-open transport. Device
//! discovery, VID/PID filtering, and the open/close lifecycle belong to
//! the caller.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the radio.
///
/// Implementations handle buffering and timeouts at the physical layer.
/// Protocol concerns (command framing, the firmware handshake) are
/// handled by the engine that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the radio.
    ///
    /// Implementations should return once all bytes have been handed to
    /// the underlying transport (serial TX buffer), or fail with
    /// [`Error::Timeout`](crate::error::Error::Timeout) /
    /// [`Error::Io`](crate::error::Error::Io) within their configured
    /// write timeout. There is no retry at any layer.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the radio into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Waits up to `timeout`
    /// for data to arrive and returns
    /// [`Error::Timeout`](crate::error::Error::Timeout) if none did.
    /// Data may arrive in arbitrarily small chunks; callers must
    /// accumulate across calls.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport.
    ///
    /// After `close()`, subsequent `send()` and `receive()` calls must
    /// return [`Error::NotConnected`](crate::error::Error::NotConnected)
    /// rather than panic.
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently open.
    fn is_connected(&self) -> bool;
}
