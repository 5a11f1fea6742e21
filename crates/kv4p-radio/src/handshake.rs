//! Firmware version handshake parser.
//!
//! After a reset the radio announces itself with an ASCII report of the
//! form `VERSION<nnnnnnnn>` -- the literal token followed by an
//! eight-character version field -- embedded somewhere in the inbound
//! stream, possibly surrounded by boot noise and possibly split across
//! many reads. The parser accumulates bytes until the full report is
//! visible, then classifies the firmware as compatible or not.

/// Minimum firmware version this library can drive.
pub const MIN_FIRMWARE_VER: i32 = 1;

const VERSION_TOKEN: &[u8] = b"VERSION";
const VERSION_FIELD_LEN: usize = 8;

/// Accumulation cap. Boot noise without a token is trimmed from the
/// front past this point, keeping enough tail to catch a report that
/// straddles the trim boundary.
const MAX_BUFFER_LEN: usize = 1024;
const TAIL_KEEP: usize = VERSION_TOKEN.len() + VERSION_FIELD_LEN - 1;

/// Result of feeding bytes to the [`HandshakeParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// No complete version report seen yet; keep feeding bytes.
    Pending,
    /// Report parsed and the version meets [`MIN_FIRMWARE_VER`].
    Compatible(i32),
    /// Report parsed but the version is below [`MIN_FIRMWARE_VER`].
    Unsupported(i32),
    /// The token was found but the version field is not a number.
    Malformed(String),
}

/// Incremental parser for the startup version report.
///
/// Feed every inbound chunk to [`push`](HandshakeParser::push) while the
/// radio is starting up. Any outcome other than
/// [`Pending`](HandshakeOutcome::Pending) is terminal: the internal
/// buffer is cleared and the parser is ready for a fresh handshake after
/// the next [`reset`](HandshakeParser::reset) (or immediately, since the
/// buffer is already empty).
#[derive(Debug, Default)]
pub struct HandshakeParser {
    buffer: Vec<u8>,
}

impl HandshakeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any accumulated bytes, ready for a new handshake.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed a chunk of inbound bytes.
    ///
    /// Returns [`HandshakeOutcome::Pending`] until the buffer contains
    /// the token plus a full eight-character field; then classifies the
    /// field and clears the buffer.
    pub fn push(&mut self, data: &[u8]) -> HandshakeOutcome {
        self.buffer.extend_from_slice(data);

        let Some(token_at) = find_token(&self.buffer) else {
            // Keep a bounded amount of noise. The tail length covers a
            // report whose first byte arrived just before the trim.
            if self.buffer.len() > MAX_BUFFER_LEN {
                let cut = self.buffer.len() - TAIL_KEEP;
                self.buffer.drain(..cut);
            }
            return HandshakeOutcome::Pending;
        };

        let field_start = token_at + VERSION_TOKEN.len();
        if self.buffer.len() < field_start + VERSION_FIELD_LEN {
            return HandshakeOutcome::Pending;
        }

        let field = self.buffer[field_start..field_start + VERSION_FIELD_LEN].to_vec();
        self.buffer.clear();

        let text = String::from_utf8_lossy(&field).into_owned();
        match text.trim().parse::<i32>() {
            Ok(version) if version >= MIN_FIRMWARE_VER => HandshakeOutcome::Compatible(version),
            Ok(version) => HandshakeOutcome::Unsupported(version),
            Err(_) => HandshakeOutcome::Malformed(text),
        }
    }
}

fn find_token(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(VERSION_TOKEN.len())
        .position(|window| window == VERSION_TOKEN)
}
