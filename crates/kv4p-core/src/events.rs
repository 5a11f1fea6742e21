//! Asynchronous radio event types.
//!
//! Events are emitted by the protocol engine through a
//! [`tokio::sync::broadcast`] channel. Applications subscribe to drive
//! displays, audio playback, and error reporting without polling.
//!
//! Payloads are [`Bytes`] so cloning an event for each subscriber is a
//! reference-count bump, not a copy -- audio chunks arrive continuously
//! while the radio is in RX mode.

use bytes::Bytes;

use crate::error::ErrorKind;
use crate::types::RadioMode;

/// An event emitted by the protocol engine.
///
/// Delivered on a best-effort basis through a bounded broadcast channel;
/// slow consumers may miss events under heavy load (e.g. a continuous
/// RX audio stream).
#[derive(Debug, Clone)]
pub enum RadioEvent {
    /// Raw bytes received from the radio, in any mode.
    ///
    /// Fires for all inbound traffic before mode dispatch -- handshake
    /// text, audio payload, anything. Intended for diagnostics and
    /// traffic displays.
    RawData(Bytes),

    /// Audio payload received while in RX or SCAN mode.
    ///
    /// The bytes are passed through opaquely; this library does no codec
    /// processing.
    AudioData(Bytes),

    /// The operating mode changed.
    ModeChanged {
        /// The mode now in effect.
        mode: RadioMode,
    },

    /// A transport or protocol error occurred on the inbound path or
    /// while writing a command frame.
    ///
    /// These never propagate to the caller of the triggering operation;
    /// the subscriber decides policy (retry, disconnect, surface to a
    /// user).
    Error {
        /// Coarse classification of the failure.
        kind: ErrorKind,
        /// Human-readable description, including the underlying cause.
        message: String,
    },
}
