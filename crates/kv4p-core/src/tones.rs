//! CTCSS tone table.
//!
//! The kv4p HT selects its CTCSS (sub-audible squelch) tone by index: the
//! `TUNE_TO` command carries a two-digit tone index where `00` means no
//! tone and `01`..`38` select from the standard EIA tone set below.
//!
//! These helpers exist for consuming applications building a tone picker;
//! the protocol engine itself only carries the index.

/// The 38 standard CTCSS tones in hertz, in index order.
///
/// Index 1 in the wire format corresponds to `CTCSS_TONES[0]` (67.0 Hz);
/// wire index 0 means "no tone".
pub const CTCSS_TONES: [f32; 38] = [
    67.0, 71.9, 74.4, 77.0, 79.7, 82.5, 85.4, 88.5, 91.5, 94.8, 97.4, 100.0, 103.5, 107.2, 110.9,
    114.8, 118.8, 123.0, 127.3, 131.8, 136.5, 141.3, 146.2, 151.4, 156.7, 162.2, 167.9, 173.8,
    179.9, 186.2, 192.8, 203.5, 210.7, 218.1, 225.7, 233.6, 241.8, 250.3,
];

/// Look up the tone frequency for a wire tone index.
///
/// Returns `None` for index 0 (no tone) and for indices beyond the tone
/// table.
pub fn ctcss_tone_hz(index: u8) -> Option<f32> {
    if index == 0 {
        return None;
    }
    CTCSS_TONES.get(index as usize - 1).copied()
}

/// Human-readable label for a wire tone index: `"None"` for 0,
/// `"{tone} Hz"` for a valid index, `None` for an out-of-range index.
pub fn ctcss_tone_label(index: u8) -> Option<String> {
    if index == 0 {
        return Some("None".to_string());
    }
    ctcss_tone_hz(index).map(|hz| format!("{hz} Hz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_zero_is_none() {
        assert_eq!(ctcss_tone_hz(0), None);
        assert_eq!(ctcss_tone_label(0).unwrap(), "None");
    }

    #[test]
    fn tone_table_bounds() {
        assert_eq!(ctcss_tone_hz(1), Some(67.0));
        assert_eq!(ctcss_tone_hz(38), Some(250.3));
        assert_eq!(ctcss_tone_hz(39), None);
        assert_eq!(ctcss_tone_label(39), None);
    }

    #[test]
    fn tone_labels() {
        assert_eq!(ctcss_tone_label(1).unwrap(), "67 Hz");
        assert_eq!(ctcss_tone_label(12).unwrap(), "100 Hz");
        assert_eq!(ctcss_tone_label(38).unwrap(), "250.3 Hz");
    }
}
