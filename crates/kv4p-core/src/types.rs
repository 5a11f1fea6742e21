//! Shared types for the kv4p control library.

use std::fmt;

/// The operating mode of the radio, as tracked by the protocol engine.
///
/// Exactly one mode is active at any instant. The mode decides how
/// inbound bytes are interpreted: during [`Startup`](RadioMode::Startup)
/// they feed the firmware handshake parser; in [`Rx`](RadioMode::Rx) and
/// [`Scan`](RadioMode::Scan) they are forwarded as opaque audio payload;
/// in [`Tx`](RadioMode::Tx) inbound payload is dropped (the radio is not
/// expected to send audio while transmitting).
///
/// `Scan` is never entered by an operation of this library; it exists for
/// completeness of the firmware's mode set and is dispatched identically
/// to `Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioMode {
    /// Waiting for the firmware version handshake after `initialize()`.
    Startup,
    /// Receiving; inbound bytes are audio payload.
    Rx,
    /// Transmitting (PTT down).
    Tx,
    /// Scanning; dispatched identically to `Rx`.
    Scan,
}

impl fmt::Display for RadioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RadioMode::Startup => "STARTUP",
            RadioMode::Rx => "RX",
            RadioMode::Tx => "TX",
            RadioMode::Scan => "SCAN",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display() {
        assert_eq!(RadioMode::Startup.to_string(), "STARTUP");
        assert_eq!(RadioMode::Rx.to_string(), "RX");
        assert_eq!(RadioMode::Tx.to_string(), "TX");
        assert_eq!(RadioMode::Scan.to_string(), "SCAN");
    }

    #[test]
    fn mode_equality() {
        assert_eq!(RadioMode::Rx, RadioMode::Rx);
        assert_ne!(RadioMode::Rx, RadioMode::Scan);
    }
}
