//! Parameter normalization and command builders.
//!
//! All functions here are pure -- they produce byte vectors and strings
//! without performing any I/O. The caller is responsible for sending the
//! frames over a transport.
//!
//! The kv4p HT is a 2 m band radio: frequencies on the wire are always a
//! fixed-width `DDD.DDD` megahertz field inside 144.000..=148.000. User
//! input is normalized into that window rather than rejected (a typo'd
//! frequency degrades to something safe to transmit on); only structural
//! problems -- blank input, an over-wide squelch or tone -- are errors.

use kv4p_core::error::{Error, Result};

use crate::protocol::{encode_command, encode_command_with_params, Command};

/// Frequency substituted when the input cannot be parsed at all.
pub const DEFAULT_FREQUENCY_MHZ: f32 = 146.520;

/// Lower edge of the tunable range, MHz.
pub const MIN_FREQUENCY_MHZ: f32 = 144.0;

/// Upper edge of the tunable range, MHz.
pub const MAX_FREQUENCY_MHZ: f32 = 148.0;

/// Normalize a user-supplied frequency string into the radio's
/// fixed-width `DDD.DDD` wire form.
///
/// This function is total: every input maps to a well-formed in-range
/// string, and the same input always yields the same output.
///
/// 1. Parse as a decimal number; on failure (or a non-finite value like
///    `inf`), substitute [`DEFAULT_FREQUENCY_MHZ`].
/// 2. While the value exceeds 148.0, divide by 10 -- this repairs inputs
///    with a misplaced decimal point ("14652" becomes 146.52).
/// 3. Clamp into `[144.0, 148.0]`, high bound first.
/// 4. Format zero-padded to three integer and three fractional digits
///    with an invariant `.` decimal point.
///
/// # Example
///
/// ```
/// use kv4p_radio::commands::normalize_frequency;
///
/// assert_eq!(normalize_frequency("146.52"), "146.520");
/// assert_eq!(normalize_frequency("200.000"), "144.000");
/// assert_eq!(normalize_frequency("not-a-number"), "146.520");
/// ```
pub fn normalize_frequency(input: &str) -> String {
    let mut freq: f32 = input.trim().parse().unwrap_or(DEFAULT_FREQUENCY_MHZ);
    if !freq.is_finite() {
        freq = DEFAULT_FREQUENCY_MHZ;
    }

    while freq > MAX_FREQUENCY_MHZ {
        freq /= 10.0;
    }

    let freq = freq.min(MAX_FREQUENCY_MHZ).max(MIN_FREQUENCY_MHZ);

    format!("{freq:07.3}")
}

/// Format a squelch level as the single wire digit.
///
/// Fails with [`Error::InvalidParameter`] if the level does not format to
/// exactly one digit (i.e. is outside 0..=9).
pub fn validate_squelch(level: u8) -> Result<String> {
    let s = level.to_string();
    if s.len() != 1 {
        return Err(Error::InvalidParameter(format!(
            "squelch level must be a single digit (0-9), got {level}"
        )));
    }
    Ok(s)
}

/// The normalized parameter block of a `TUNE_TO` command.
///
/// Wire layout is exactly 17 ASCII bytes:
///
/// ```text
/// <tx: 7> <rx: 7> <tone: 2> <squelch: 1>
/// ```
///
/// with both frequencies in `DDD.DDD` form, the CTCSS tone index
/// zero-padded to two digits, and squelch a single digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneParams {
    /// Transmit frequency, `DDD.DDD`.
    pub tx_frequency: String,
    /// Receive frequency, `DDD.DDD`.
    pub rx_frequency: String,
    /// CTCSS tone index, two digits (`00` = no tone).
    pub tone: String,
    /// Squelch level, one digit.
    pub squelch: String,
}

impl TuneParams {
    /// Build a normalized parameter block from user input.
    ///
    /// Blank `tx` or `rx` fails with [`Error::InvalidParameter`] before
    /// any normalization happens; a tone index wider than two digits or
    /// a squelch level wider than one digit fails likewise. Everything
    /// else is normalized, never rejected.
    pub fn new(tx: &str, rx: &str, tone: u8, squelch: u8) -> Result<Self> {
        if tx.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "transmit frequency cannot be blank".into(),
            ));
        }
        if rx.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "receive frequency cannot be blank".into(),
            ));
        }

        let tone_str = format!("{tone:02}");
        if tone_str.len() != 2 {
            return Err(Error::InvalidParameter(format!(
                "tone index must be at most two digits (0-99), got {tone}"
            )));
        }

        Ok(TuneParams {
            tx_frequency: normalize_frequency(tx),
            rx_frequency: normalize_frequency(rx),
            tone: tone_str,
            squelch: validate_squelch(squelch)?,
        })
    }

    /// The 17-byte ASCII wire form `tx ‖ rx ‖ tone ‖ squelch`.
    pub fn wire_params(&self) -> String {
        format!(
            "{}{}{}{}",
            self.tx_frequency, self.rx_frequency, self.tone, self.squelch
        )
    }

    /// Decode a 17-byte parameter block back into its fields.
    ///
    /// Inverse of [`wire_params`](Self::wire_params) for already
    /// normalized blocks.
    pub fn parse(block: &str) -> Result<Self> {
        if block.len() != 17 || !block.is_ascii() {
            return Err(Error::InvalidParameter(format!(
                "tune parameter block must be 17 ASCII bytes, got {}",
                block.len()
            )));
        }
        Ok(TuneParams {
            tx_frequency: block[0..7].to_string(),
            rx_frequency: block[7..14].to_string(),
            tone: block[14..16].to_string(),
            squelch: block[16..17].to_string(),
        })
    }
}

/// Audio filter switches applied with the `FILTERS` command.
///
/// Wire form is three ASCII flag characters, `1` = enabled, in the order
/// emphasis, high-pass, low-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterConfig {
    /// Pre/de-emphasis filter.
    pub emphasis: bool,
    /// High-pass filter.
    pub high_pass: bool,
    /// Low-pass filter.
    pub low_pass: bool,
}

impl FilterConfig {
    /// The three-character wire form.
    pub fn wire_params(&self) -> String {
        let flag = |on: bool| if on { '1' } else { '0' };
        format!(
            "{}{}{}",
            flag(self.emphasis),
            flag(self.high_pass),
            flag(self.low_pass)
        )
    }
}

// ---------------------------------------------------------------
// Command builders
// ---------------------------------------------------------------

/// Build a `STOP` frame.
pub fn cmd_stop() -> Vec<u8> {
    encode_command(Command::Stop)
}

/// Build a `GET_FIRMWARE_VER` frame.
pub fn cmd_get_firmware_ver() -> Vec<u8> {
    encode_command(Command::GetFirmwareVer)
}

/// Build a `PTT_DOWN` frame (key the transmitter).
pub fn cmd_ptt_down() -> Vec<u8> {
    encode_command(Command::PttDown)
}

/// Build a `PTT_UP` frame (release the transmitter).
pub fn cmd_ptt_up() -> Vec<u8> {
    encode_command(Command::PttUp)
}

/// Build a `TUNE_TO` frame carrying the 17-byte parameter block.
pub fn cmd_tune_to(params: &TuneParams) -> Vec<u8> {
    encode_command_with_params(Command::TuneTo, &params.wire_params())
}

/// Build a `FILTERS` frame carrying the three filter flags.
pub fn cmd_set_filters(config: &FilterConfig) -> Vec<u8> {
    encode_command_with_params(Command::Filters, &config.wire_params())
}
