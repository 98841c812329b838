//! The memory channel record model.
//!
//! [`MemoryChannel`] is the record-level view of one memory location: the
//! `MT` frame fields plus the tone/DCS value (which travels via `CN`) and
//! the repeater offset (which this rig keeps as a per-band menu setting,
//! so it exists in backup files but not in the channel frame).
//!
//! Validation is a pure function applied before any record is sent to
//! the device or written to a file, and to records read back from the
//! device to catch corruption.

use ft991util_core::coverage::{RECEIVER_COVERAGE, in_coverage};
use ft991util_core::error::FieldViolation;
use ft991util_core::types::{Mode, RepeaterShift, ToneSquelch};

use crate::commands::ChannelFrame;

/// Lowest valid memory channel number.
pub const CHANNEL_MIN: u16 = 1;
/// Highest valid memory channel number (99 regular memories plus the
/// PMS pairs, all addressed through the same `MC`/`MT` channel space).
pub const CHANNEL_MAX: u16 = 117;

/// Maximum tag length in characters.
pub const TAG_MAX_LEN: usize = 12;

/// Maximum repeater offset magnitude in hertz.
pub const OFFSET_MAX_HZ: u32 = 9_999_900;

/// Maximum clarifier offset magnitude in hertz.
pub const CLAR_MAX_HZ: i32 = 9999;

/// One fully-described memory channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryChannel {
    /// Channel number (1-117), unique within a backup set.
    pub channel: u16,
    /// Receive frequency in hertz.
    pub freq_hz: u64,
    /// Operating mode.
    pub mode: Mode,
    /// Repeater offset magnitude in hertz; 0 unless `shift` is set.
    pub offset_hz: u32,
    /// Repeater shift direction.
    pub shift: RepeaterShift,
    /// Tone squelch mode and value.
    pub tone: ToneSquelch,
    /// Receive clarifier offset in hertz; 0 means the clarifier is off.
    pub clar_hz: i32,
    /// Channel tag (at most 12 characters, see [`is_tag_char`]).
    pub tag: String,
    /// Memory scan skip flag.
    pub skip: bool,
}

/// Whether `c` is allowed in a channel tag.
pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '+' | '-' | '/' | '#' | '*' | '.')
}

impl MemoryChannel {
    /// Validate every field against its domain.
    ///
    /// Returns the first offending field, in field order, so the
    /// operator sees a stable, specific message like
    /// `channel 42: frequency 999999999 Hz outside receiver coverage`.
    pub fn validate(&self) -> Result<(), FieldViolation> {
        let record = format!("channel {}", self.channel);

        if self.channel < CHANNEL_MIN || self.channel > CHANNEL_MAX {
            return Err(FieldViolation::new(
                format!("channel {}", self.channel),
                "channel",
                format!("must be between {CHANNEL_MIN} and {CHANNEL_MAX}, inclusive"),
            ));
        }

        if !in_coverage(self.freq_hz) {
            let segments: Vec<String> =
                RECEIVER_COVERAGE.iter().map(|s| s.to_string()).collect();
            return Err(FieldViolation::new(
                record.as_str(),
                "frequency",
                format!(
                    "{} Hz outside receiver coverage ({})",
                    self.freq_hz,
                    segments.join(", ")
                ),
            ));
        }

        if self.shift == RepeaterShift::Off && self.offset_hz != 0 {
            return Err(FieldViolation::new(
                record.as_str(),
                "offset",
                format!("{} Hz given with repeater shift OFF", self.offset_hz),
            ));
        }
        if self.offset_hz > OFFSET_MAX_HZ {
            return Err(FieldViolation::new(
                record.as_str(),
                "offset",
                format!("{} Hz exceeds maximum of {OFFSET_MAX_HZ} Hz", self.offset_hz),
            ));
        }

        if self.clar_hz.abs() > CLAR_MAX_HZ {
            return Err(FieldViolation::new(
                record.as_str(),
                "clarifier",
                format!(
                    "must be between -{CLAR_MAX_HZ} Hz and +{CLAR_MAX_HZ} Hz, inclusive, got {}",
                    self.clar_hz
                ),
            ));
        }

        if self.tag.len() > TAG_MAX_LEN {
            return Err(FieldViolation::new(
                record.as_str(),
                "tag",
                format!("{:?} is longer than {TAG_MAX_LEN} characters", self.tag),
            ));
        }
        if let Some(bad) = self.tag.chars().find(|&c| !is_tag_char(c)) {
            return Err(FieldViolation::new(
                record.as_str(),
                "tag",
                format!("contains unsupported character {bad:?}"),
            ));
        }
        if self.tag.starts_with(' ') || self.tag.ends_with(' ') {
            return Err(FieldViolation::new(
                record.as_str(),
                "tag",
                "must not begin or end with a space (the frame pads with spaces)",
            ));
        }

        Ok(())
    }

    /// The wire frame for this record.
    ///
    /// The clarifier enable flags derive from the offset: non-zero means
    /// RX clarifier on; the TX clarifier is always restored off.
    pub fn to_frame(&self) -> ChannelFrame {
        ChannelFrame {
            channel: self.channel,
            freq_hz: self.freq_hz,
            clar_hz: self.clar_hz,
            rx_clar: self.clar_hz != 0,
            tx_clar: false,
            mode: self.mode,
            tone_mode: (&self.tone).into(),
            shift: self.shift,
            skip: self.skip,
            tag: self.tag.clone(),
        }
    }

    /// Assemble a record from a frame read off the device plus the
    /// separately-read tone squelch value.
    ///
    /// A residual clarifier offset with the clarifier disabled is
    /// normalized to 0; the offset magnitude is not device-readable per
    /// channel and decodes as 0.
    pub fn from_device(frame: &ChannelFrame, tone: ToneSquelch) -> MemoryChannel {
        MemoryChannel {
            channel: frame.channel,
            freq_hz: frame.freq_hz,
            mode: frame.mode,
            offset_hz: 0,
            shift: frame.shift,
            tone,
            clar_hz: if frame.rx_clar { frame.clar_hz } else { 0 },
            tag: frame.tag.clone(),
            skip: frame.skip,
        }
    }
}
