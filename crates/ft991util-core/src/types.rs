//! Core value types for FT-991 memory channels.
//!
//! These types model the enumerated domains of the FT-991's channel
//! fields: operating mode, repeater shift direction, and tone squelch
//! (CTCSS tone / DCS code). Every constructor is a checked lookup --
//! there is no way to hold a tone frequency or mode name the device does
//! not support.
//!
//! The CAT wire encodings for these types live in `ft991util-cat`; this
//! crate only knows the values themselves and their display names (the
//! same names used in backup files).

use std::fmt;
use std::str::FromStr;

/// Operating mode of a memory channel.
///
/// This is the FT-991's native mode set, one variant per CAT mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Lower sideband voice.
    LSB,
    /// Upper sideband voice.
    USB,
    /// CW (morse).
    CW,
    /// Frequency modulation.
    FM,
    /// Amplitude modulation.
    AM,
    /// Radio teletype (FSK), lower sideband.
    RttyLsb,
    /// CW reverse (lower sideband offset).
    CwR,
    /// Data mode using lower sideband.
    DataLsb,
    /// Radio teletype (FSK), upper sideband.
    RttyUsb,
    /// Data mode using FM.
    DataFm,
    /// Narrow FM.
    FmN,
    /// Data mode using upper sideband (AFSK, sound-card digital).
    DataUsb,
    /// Narrow AM.
    AmN,
    /// Yaesu C4FM digital voice.
    C4FM,
}

/// All modes, in CAT code order.
pub const ALL_MODES: &[Mode] = &[
    Mode::LSB,
    Mode::USB,
    Mode::CW,
    Mode::FM,
    Mode::AM,
    Mode::RttyLsb,
    Mode::CwR,
    Mode::DataLsb,
    Mode::RttyUsb,
    Mode::DataFm,
    Mode::FmN,
    Mode::DataUsb,
    Mode::AmN,
    Mode::C4FM,
];

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::LSB => "LSB",
            Mode::USB => "USB",
            Mode::CW => "CW",
            Mode::FM => "FM",
            Mode::AM => "AM",
            Mode::RttyLsb => "RTTY-LSB",
            Mode::CwR => "CW-R",
            Mode::DataLsb => "DATA-LSB",
            Mode::RttyUsb => "RTTY-USB",
            Mode::DataFm => "DATA-FM",
            Mode::FmN => "FM-N",
            Mode::DataUsb => "DATA-USB",
            Mode::AmN => "AM-N",
            Mode::C4FM => "C4FM",
        };
        write!(f, "{s}")
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode name: {:?}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LSB" => Ok(Mode::LSB),
            "USB" => Ok(Mode::USB),
            "CW" => Ok(Mode::CW),
            "FM" => Ok(Mode::FM),
            "AM" => Ok(Mode::AM),
            "RTTY-LSB" => Ok(Mode::RttyLsb),
            "CW-R" => Ok(Mode::CwR),
            "DATA-LSB" => Ok(Mode::DataLsb),
            "RTTY-USB" => Ok(Mode::RttyUsb),
            "DATA-FM" => Ok(Mode::DataFm),
            "FM-N" => Ok(Mode::FmN),
            "DATA-USB" => Ok(Mode::DataUsb),
            "AM-N" => Ok(Mode::AmN),
            "C4FM" => Ok(Mode::C4FM),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Repeater shift direction of a memory channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RepeaterShift {
    /// Simplex, no shift.
    #[default]
    Off,
    /// Transmit above the receive frequency.
    Plus,
    /// Transmit below the receive frequency.
    Minus,
}

impl fmt::Display for RepeaterShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeaterShift::Off => "OFF",
            RepeaterShift::Plus => "+RPT",
            RepeaterShift::Minus => "-RPT",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RepeaterShift {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "OFF" => Ok(RepeaterShift::Off),
            "+RPT" => Ok(RepeaterShift::Plus),
            "-RPT" => Ok(RepeaterShift::Minus),
            other => Err(format!("unknown repeater shift: {other:?}")),
        }
    }
}

/// The 50 standard CTCSS tones, in tenths of hertz, in the FT-991's
/// table order. The position of a tone in this table is its CAT index.
pub const CTCSS_TONES_TENTHS: &[u16] = &[
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148,
    1188, 1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, 1713, 1738,
    1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257, 2291, 2336,
    2418, 2503, 2541,
];

/// One CTCSS sub-audible tone, guaranteed to be in the FT-991's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtcssTone(u16);

impl CtcssTone {
    /// Look up a tone by its frequency in tenths of hertz
    /// (e.g. `885` for 88.5 Hz). Returns `None` for frequencies not in
    /// the device's tone table.
    pub fn from_tenths(tenths: u16) -> Option<CtcssTone> {
        CTCSS_TONES_TENTHS
            .iter()
            .find(|&&t| t == tenths)
            .map(|&t| CtcssTone(t))
    }

    /// The tone frequency in tenths of hertz.
    pub fn tenths(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CtcssTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} Hz", self.0 / 10, self.0 % 10)
    }
}

impl FromStr for CtcssTone {
    type Err = String;

    /// Parses `"88.5 Hz"` (the display and backup-file form) or a bare
    /// `"88.5"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(" Hz");
        let tenths = match s.split_once('.') {
            Some((whole, frac)) => {
                if frac.len() != 1 {
                    return Err(format!("bad CTCSS tone: {s:?}"));
                }
                let whole: u16 = whole.parse().map_err(|_| format!("bad CTCSS tone: {s:?}"))?;
                let frac: u16 = frac.parse().map_err(|_| format!("bad CTCSS tone: {s:?}"))?;
                whole * 10 + frac
            }
            None => {
                let whole: u16 = s.parse().map_err(|_| format!("bad CTCSS tone: {s:?}"))?;
                whole * 10
            }
        };
        CtcssTone::from_tenths(tenths).ok_or_else(|| format!("{s} Hz is not a standard CTCSS tone"))
    }
}

/// The 104 standard DCS codes in the FT-991's table order. The position
/// of a code in this table is its CAT index.
pub const DCS_CODES: &[u16] = &[
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125,
    131, 132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243,
    244, 245, 246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332,
    343, 346, 351, 356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455,
    462, 464, 465, 466, 503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632,
    654, 662, 664, 703, 712, 723, 731, 732, 734, 743, 754,
];

/// One DCS code, guaranteed to be in the FT-991's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DcsCode(u16);

impl DcsCode {
    /// Look up a DCS code by its octal-printed value (e.g. `23`).
    /// Returns `None` for codes not in the device's table.
    pub fn from_code(code: u16) -> Option<DcsCode> {
        DCS_CODES.iter().find(|&&c| c == code).map(|&c| DcsCode(c))
    }

    /// The DCS code value as printed (e.g. `23` for DCS 023).
    pub fn code(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for DcsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for DcsCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code: u16 = s
            .trim()
            .parse()
            .map_err(|_| format!("bad DCS code: {s:?}"))?;
        DcsCode::from_code(code).ok_or_else(|| format!("{code:03} is not a standard DCS code"))
    }
}

/// Tone squelch configuration of a memory channel: the signaling mode
/// together with its tone or code.
///
/// The tagged representation makes an impossible state (DCS mode with a
/// CTCSS tone, or a tone with squelch off) unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToneSquelch {
    /// No tone signaling.
    #[default]
    Off,
    /// CTCSS encode and decode (tone squelch).
    CtcssEncDec(CtcssTone),
    /// CTCSS encode only (repeater access tone).
    CtcssEnc(CtcssTone),
    /// DCS encode only.
    Dcs(DcsCode),
    /// DCS encode and decode.
    DcsEncDec(DcsCode),
}

impl ToneSquelch {
    /// The signaling mode name, as shown in backup files.
    pub fn mode_name(&self) -> &'static str {
        match self {
            ToneSquelch::Off => "OFF",
            ToneSquelch::CtcssEncDec(_) => "ENC/DEC",
            ToneSquelch::CtcssEnc(_) => "TONE ENC",
            ToneSquelch::Dcs(_) => "DCS",
            ToneSquelch::DcsEncDec(_) => "DCS ENC/DEC",
        }
    }

    /// The tone or code value as shown in backup files
    /// (empty when signaling is off).
    pub fn value_text(&self) -> String {
        match self {
            ToneSquelch::Off => String::new(),
            ToneSquelch::CtcssEncDec(t) | ToneSquelch::CtcssEnc(t) => t.to_string(),
            ToneSquelch::Dcs(c) | ToneSquelch::DcsEncDec(c) => c.to_string(),
        }
    }

    /// The CTCSS tone, if this configuration carries one.
    pub fn ctcss(&self) -> Option<CtcssTone> {
        match self {
            ToneSquelch::CtcssEncDec(t) | ToneSquelch::CtcssEnc(t) => Some(*t),
            _ => None,
        }
    }

    /// The DCS code, if this configuration carries one.
    pub fn dcs(&self) -> Option<DcsCode> {
        match self {
            ToneSquelch::Dcs(c) | ToneSquelch::DcsEncDec(c) => Some(*c),
            _ => None,
        }
    }

    /// Reassemble a configuration from its mode name and value text
    /// (the backup-file representation).
    pub fn from_parts(mode_name: &str, value: &str) -> std::result::Result<Self, String> {
        match mode_name {
            "OFF" => {
                if value.is_empty() {
                    Ok(ToneSquelch::Off)
                } else {
                    Err(format!("tone value {value:?} given with tone mode OFF"))
                }
            }
            "ENC/DEC" => value.parse().map(ToneSquelch::CtcssEncDec),
            "TONE ENC" => value.parse().map(ToneSquelch::CtcssEnc),
            "DCS" => value.parse().map(ToneSquelch::Dcs),
            "DCS ENC/DEC" => value.parse().map(ToneSquelch::DcsEncDec),
            other => Err(format!("unknown tone mode: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_round_trip() {
        for &mode in ALL_MODES {
            let parsed: Mode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode, "round-trip failed for {mode}");
        }
    }

    #[test]
    fn mode_unknown_name_rejected() {
        assert!("XSB".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
        assert!("usb".parse::<Mode>().is_err());
    }

    #[test]
    fn shift_display_round_trip() {
        for shift in [RepeaterShift::Off, RepeaterShift::Plus, RepeaterShift::Minus] {
            let parsed: RepeaterShift = shift.to_string().parse().unwrap();
            assert_eq!(parsed, shift);
        }
    }

    #[test]
    fn ctcss_table_has_fifty_tones() {
        assert_eq!(CTCSS_TONES_TENTHS.len(), 50);
    }

    #[test]
    fn ctcss_lookup_known() {
        let tone = CtcssTone::from_tenths(885).unwrap();
        assert_eq!(tone.to_string(), "88.5 Hz");
    }

    #[test]
    fn ctcss_lookup_unknown() {
        assert!(CtcssTone::from_tenths(1001).is_none());
        assert!(CtcssTone::from_tenths(0).is_none());
    }

    #[test]
    fn ctcss_parse_display_form() {
        let tone: CtcssTone = "127.3 Hz".parse().unwrap();
        assert_eq!(tone.tenths(), 1273);
    }

    #[test]
    fn ctcss_parse_bare_form() {
        let tone: CtcssTone = "100.0".parse().unwrap();
        assert_eq!(tone.tenths(), 1000);
    }

    #[test]
    fn ctcss_parse_nonstandard_rejected() {
        assert!("100.1 Hz".parse::<CtcssTone>().is_err());
        assert!("abc".parse::<CtcssTone>().is_err());
    }

    #[test]
    fn dcs_table_has_104_codes() {
        assert_eq!(DCS_CODES.len(), 104);
    }

    #[test]
    fn dcs_lookup_known() {
        let code = DcsCode::from_code(23).unwrap();
        assert_eq!(code.to_string(), "023");
    }

    #[test]
    fn dcs_lookup_unknown() {
        assert!(DcsCode::from_code(24).is_none());
        assert!(DcsCode::from_code(0).is_none());
    }

    #[test]
    fn dcs_parse_display_form() {
        let code: DcsCode = "445".parse().unwrap();
        assert_eq!(code.code(), 445);
    }

    #[test]
    fn tone_squelch_parts_round_trip() {
        let configs = [
            ToneSquelch::Off,
            ToneSquelch::CtcssEncDec(CtcssTone::from_tenths(885).unwrap()),
            ToneSquelch::CtcssEnc(CtcssTone::from_tenths(1273).unwrap()),
            ToneSquelch::Dcs(DcsCode::from_code(23).unwrap()),
            ToneSquelch::DcsEncDec(DcsCode::from_code(754).unwrap()),
        ];
        for config in configs {
            let rebuilt =
                ToneSquelch::from_parts(config.mode_name(), &config.value_text()).unwrap();
            assert_eq!(rebuilt, config);
        }
    }

    #[test]
    fn tone_squelch_off_with_value_rejected() {
        assert!(ToneSquelch::from_parts("OFF", "88.5 Hz").is_err());
    }

    #[test]
    fn tone_squelch_unknown_mode_rejected() {
        assert!(ToneSquelch::from_parts("TONES", "88.5 Hz").is_err());
    }

    #[test]
    fn tone_squelch_dcs_with_ctcss_value_rejected() {
        assert!(ToneSquelch::from_parts("DCS", "88.5 Hz").is_err());
    }
}
