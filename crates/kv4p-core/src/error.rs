//! Error types for the kv4p control library.
//!
//! All fallible operations return [`Result<T>`], which uses [`Error`] as
//! the error type. Validation failures are returned synchronously from the
//! triggering call; transport and protocol failures detected on the inbound
//! path are reported through [`RadioEvent::Error`](crate::events::RadioEvent)
//! instead, tagged with an [`ErrorKind`].

/// The error type for all kv4p operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open/read/write failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (malformed or unsupported firmware
    /// handshake, unparseable wire data).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Timed out waiting for data from the radio.
    #[error("timeout waiting for data")]
    Timeout,

    /// An invalid parameter was passed to a radio command.
    ///
    /// This is the synchronous validation failure: a squelch level wider
    /// than one digit, a blank frequency string, a tone index wider than
    /// two digits. Nothing is sent on the wire when this is returned.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the radio has been established, or the radio has
    /// been closed.
    #[error("not connected")]
    NotConnected,

    /// The connection to the radio was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an error, carried by error events so
/// subscribers can decide policy without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte channel failed (write timeout, I/O error, port closed).
    Transport,
    /// The radio sent something the protocol engine could not accept.
    Protocol,
}

impl Error {
    /// Classify this error for event reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Protocol(_) | Error::InvalidParameter(_) => ErrorKind::Protocol,
            Error::Transport(_)
            | Error::Timeout
            | Error::NotConnected
            | Error::ConnectionLost
            | Error::Io(_) => ErrorKind::Transport,
        }
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_protocol() {
        let e = Error::Protocol("invalid firmware version format".into());
        assert_eq!(e.to_string(), "protocol error: invalid firmware version format");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("squelch level must be a single digit".into());
        assert_eq!(
            e.to_string(),
            "invalid parameter: squelch level must be a single digit"
        );
    }

    #[test]
    fn error_display_not_connected() {
        assert_eq!(Error::NotConnected.to_string(), "not connected");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_kind_classification() {
        assert_eq!(Error::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(Error::NotConnected.kind(), ErrorKind::Transport);
        assert_eq!(Error::Transport("x".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::Protocol("x".into()).kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::InvalidParameter("x".into()).kind(),
            ErrorKind::Protocol
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
