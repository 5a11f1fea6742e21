//! kv4p command frame encoder.
//!
//! Every command sent to the radio is one frame:
//!
//! ```text
//! <delimiter: 8 bytes> <opcode: 1 byte> <params: 0..n ASCII bytes>
//! ```
//!
//! The delimiter is the fixed sequence `FF 00 FF 00 FF 00 FF 00`; the
//! firmware scans for it to resynchronize on the command boundary. The
//! parameter layout is opcode-specific (`TUNE_TO` carries a 17-byte
//! block, `FILTERS` three flag characters, the rest none). Frames are
//! never acknowledged; the radio's inbound stream is independent of the
//! command channel.

use bytes::{BufMut, BytesMut};

/// The 8-byte frame delimiter that precedes every command.
pub const COMMAND_DELIMITER: [u8; 8] = [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00];

/// Command opcodes understood by the kv4p HT firmware.
///
/// The discriminants are the wire opcode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Key the transmitter.
    PttDown = 1,
    /// Release the transmitter.
    PttUp = 2,
    /// Tune to a TX/RX frequency pair with tone and squelch
    /// (17-byte parameter block, see [`crate::commands::TuneParams`]).
    TuneTo = 3,
    /// Configure the audio filters (three `0`/`1` flag characters).
    Filters = 4,
    /// Stop whatever is in progress and return to an idle receive state.
    Stop = 5,
    /// Request the firmware version report.
    GetFirmwareVer = 6,
}

impl Command {
    /// The opcode byte for this command.
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// Encode a parameterless command frame.
pub fn encode_command(command: Command) -> Vec<u8> {
    encode_command_with_params(command, "")
}

/// Encode a command frame with an ASCII parameter block.
///
/// The frame is always `9 + params.len()` bytes: delimiter, opcode,
/// parameters. Parameter semantics are not validated here -- that is the
/// job of the builders in [`crate::commands`], which only ever produce
/// ASCII.
///
/// # Example
///
/// ```
/// use kv4p_radio::protocol::{encode_command, Command, COMMAND_DELIMITER};
///
/// let frame = encode_command(Command::Stop);
/// assert_eq!(&frame[..8], &COMMAND_DELIMITER);
/// assert_eq!(frame[8], 5);
/// assert_eq!(frame.len(), 9);
/// ```
pub fn encode_command_with_params(command: Command, params: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(COMMAND_DELIMITER.len() + 1 + params.len());
    buf.put_slice(&COMMAND_DELIMITER);
    buf.put_u8(command.opcode());
    buf.put_slice(params.as_bytes());
    buf.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_is_eight_bytes() {
        assert_eq!(COMMAND_DELIMITER.len(), 8);
        assert_eq!(
            COMMAND_DELIMITER,
            [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]
        );
    }

    #[test]
    fn opcode_values_match_firmware() {
        assert_eq!(Command::PttDown.opcode(), 1);
        assert_eq!(Command::PttUp.opcode(), 2);
        assert_eq!(Command::TuneTo.opcode(), 3);
        assert_eq!(Command::Filters.opcode(), 4);
        assert_eq!(Command::Stop.opcode(), 5);
        assert_eq!(Command::GetFirmwareVer.opcode(), 6);
    }

    #[test]
    fn encode_parameterless_command() {
        let frame = encode_command(Command::GetFirmwareVer);
        assert_eq!(frame.len(), 9);
        assert_eq!(&frame[..8], &COMMAND_DELIMITER);
        assert_eq!(frame[8], 6);
    }

    #[test]
    fn encode_command_with_ascii_params() {
        let frame = encode_command_with_params(Command::TuneTo, "146.520146.520002");
        assert_eq!(frame.len(), 9 + 17);
        assert_eq!(&frame[..8], &COMMAND_DELIMITER);
        assert_eq!(frame[8], 3);
        assert_eq!(&frame[9..], b"146.520146.520002");
    }

    #[test]
    fn encode_empty_params_equals_parameterless() {
        assert_eq!(
            encode_command(Command::Stop),
            encode_command_with_params(Command::Stop, "")
        );
    }
}
