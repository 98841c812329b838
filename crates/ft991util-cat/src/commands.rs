//! FT-991 CAT command builders and reply parsers.
//!
//! This is the closed command set the utility speaks, one [`Mnemonic`]
//! per command, each pairing a pure encode function with its exact
//! inverse decode function. All functions here produce or consume byte
//! vectors / string slices without performing any I/O; the
//! [`Ft991`](crate::rig::Ft991) handle moves the bytes.
//!
//! # The `MT` payload layout
//!
//! The memory-with-tag command carries a fixed 38-character payload, the
//! same layout in both directions:
//!
//! | Offset | Len | Field                               |
//! |--------|-----|-------------------------------------|
//! | 0      | 3   | Channel number (001-117)            |
//! | 3      | 9   | Frequency in Hz, zero padded        |
//! | 12     | 5   | Clarifier offset, sign + 4 digits   |
//! | 17     | 1   | RX clarifier on/off                 |
//! | 18     | 1   | TX clarifier on/off                 |
//! | 19     | 1   | Mode code (`1`-`E`)                 |
//! | 20     | 1   | Reserved (`0`)                      |
//! | 21     | 1   | Tone squelch mode (`0`-`4`)         |
//! | 22     | 2   | Reserved (`00`)                     |
//! | 24     | 1   | Repeater shift (`0`-`2`)            |
//! | 25     | 1   | Memory scan skip                    |
//! | 26     | 12  | Tag, space padded right             |
//!
//! Tone and DCS values are not part of the `MT` payload; they are read
//! and written through `CN` against the currently selected channel.

use ft991util_core::error::{Error, Result};
use ft991util_core::types::{CtcssTone, DcsCode, Mode, RepeaterShift, ToneSquelch};

use crate::protocol::encode_command;
use crate::tables;

/// Total length of the `MT` payload, request and reply alike.
pub const CHANNEL_PAYLOAD_LEN: usize = 38;

// ---------------------------------------------------------------
// Mnemonic dispatch table
// ---------------------------------------------------------------

/// The closed set of CAT commands this utility issues.
///
/// Each variant names one command; [`tag()`](Mnemonic::tag) gives the
/// wire tag the rig echoes in its reply. Dispatch is an exhaustive match
/// on this enum -- adding a command without its codec pair is a compile
/// error, and every pair is covered by a round-trip test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// `MT` -- read or write one memory channel including its tag.
    MemoryWithTag,
    /// `MC` -- select the current memory channel.
    MemorySelect,
    /// `CN00` -- read or write the CTCSS tone of the selected channel.
    ToneFrequency,
    /// `CN01` -- read or write the DCS code of the selected channel.
    DcsSelection,
    /// `RT` -- RX clarifier on/off.
    RxClarifier,
    /// `XT` -- TX clarifier on/off.
    TxClarifier,
    /// `EX` -- read or write one menu item.
    MenuItem,
}

/// Every mnemonic, for exhaustive table tests.
pub const ALL_MNEMONICS: &[Mnemonic] = &[
    Mnemonic::MemoryWithTag,
    Mnemonic::MemorySelect,
    Mnemonic::ToneFrequency,
    Mnemonic::DcsSelection,
    Mnemonic::RxClarifier,
    Mnemonic::TxClarifier,
    Mnemonic::MenuItem,
];

impl Mnemonic {
    /// The command tag as echoed in the rig's reply prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Mnemonic::MemoryWithTag => "MT",
            Mnemonic::MemorySelect => "MC",
            Mnemonic::ToneFrequency | Mnemonic::DcsSelection => "CN",
            Mnemonic::RxClarifier => "RT",
            Mnemonic::TxClarifier => "XT",
            Mnemonic::MenuItem => "EX",
        }
    }
}

// ---------------------------------------------------------------
// Wire-level enumerations
// ---------------------------------------------------------------

/// Tone squelch mode discriminant as carried in the `MT` payload.
///
/// The associated tone or code value travels separately via `CN`, so the
/// frame codec works with the bare discriminant; the full
/// [`ToneSquelch`] is assembled by the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToneMode {
    /// No tone signaling.
    #[default]
    Off,
    /// CTCSS encode and decode.
    CtcssEncDec,
    /// CTCSS encode only.
    CtcssEnc,
    /// DCS encode only.
    Dcs,
    /// DCS encode and decode.
    DcsEncDec,
}

impl From<&ToneSquelch> for ToneMode {
    fn from(tone: &ToneSquelch) -> Self {
        match tone {
            ToneSquelch::Off => ToneMode::Off,
            ToneSquelch::CtcssEncDec(_) => ToneMode::CtcssEncDec,
            ToneSquelch::CtcssEnc(_) => ToneMode::CtcssEnc,
            ToneSquelch::Dcs(_) => ToneMode::Dcs,
            ToneSquelch::DcsEncDec(_) => ToneMode::DcsEncDec,
        }
    }
}

fn tone_mode_to_code(mode: ToneMode) -> char {
    match mode {
        ToneMode::Off => '0',
        ToneMode::CtcssEncDec => '1',
        ToneMode::CtcssEnc => '2',
        ToneMode::Dcs => '3',
        ToneMode::DcsEncDec => '4',
    }
}

fn tone_mode_from_code(code: char) -> Result<ToneMode> {
    match code {
        '0' => Ok(ToneMode::Off),
        '1' => Ok(ToneMode::CtcssEncDec),
        '2' => Ok(ToneMode::CtcssEnc),
        '3' => Ok(ToneMode::Dcs),
        '4' => Ok(ToneMode::DcsEncDec),
        other => Err(Error::Protocol(format!(
            "unknown tone squelch mode code: {other:?}"
        ))),
    }
}

/// Convert a [`Mode`] to its single-character CAT code.
pub fn mode_to_code(mode: Mode) -> char {
    match mode {
        Mode::LSB => '1',
        Mode::USB => '2',
        Mode::CW => '3',
        Mode::FM => '4',
        Mode::AM => '5',
        Mode::RttyLsb => '6',
        Mode::CwR => '7',
        Mode::DataLsb => '8',
        Mode::RttyUsb => '9',
        Mode::DataFm => 'A',
        Mode::FmN => 'B',
        Mode::DataUsb => 'C',
        Mode::AmN => 'D',
        Mode::C4FM => 'E',
    }
}

/// Convert a single-character CAT mode code to a [`Mode`].
pub fn mode_from_code(code: char) -> Result<Mode> {
    match code {
        '1' => Ok(Mode::LSB),
        '2' => Ok(Mode::USB),
        '3' => Ok(Mode::CW),
        '4' => Ok(Mode::FM),
        '5' => Ok(Mode::AM),
        '6' => Ok(Mode::RttyLsb),
        '7' => Ok(Mode::CwR),
        '8' => Ok(Mode::DataLsb),
        '9' => Ok(Mode::RttyUsb),
        'A' => Ok(Mode::DataFm),
        'B' => Ok(Mode::FmN),
        'C' => Ok(Mode::DataUsb),
        'D' => Ok(Mode::AmN),
        'E' => Ok(Mode::C4FM),
        other => Err(Error::Protocol(format!("unknown mode code: {other:?}"))),
    }
}

fn shift_to_code(shift: RepeaterShift) -> char {
    match shift {
        RepeaterShift::Off => '0',
        RepeaterShift::Plus => '1',
        RepeaterShift::Minus => '2',
    }
}

fn shift_from_code(code: char) -> Result<RepeaterShift> {
    match code {
        '0' => Ok(RepeaterShift::Off),
        '1' => Ok(RepeaterShift::Plus),
        '2' => Ok(RepeaterShift::Minus),
        other => Err(Error::Protocol(format!(
            "unknown repeater shift code: {other:?}"
        ))),
    }
}

fn flag_from_code(code: char, field: &str) -> Result<bool> {
    match code {
        '0' => Ok(false),
        '1' => Ok(true),
        other => Err(Error::Protocol(format!(
            "expected 0 or 1 for {field}, got {other:?}"
        ))),
    }
}

// ---------------------------------------------------------------
// The MT channel frame
// ---------------------------------------------------------------

/// The wire-level fields of one `MT` payload.
///
/// This mirrors the frame byte-for-byte; notably the clarifier is the
/// raw (offset, RX flag, TX flag) triple and the tone squelch is the
/// bare discriminant. [`MemoryChannel`](crate::memory::MemoryChannel) is
/// the record-level view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFrame {
    /// Memory channel number (1-117).
    pub channel: u16,
    /// Receive frequency in hertz.
    pub freq_hz: u64,
    /// Clarifier offset in hertz (-9999..=9999).
    pub clar_hz: i32,
    /// RX clarifier enabled.
    pub rx_clar: bool,
    /// TX clarifier enabled.
    pub tx_clar: bool,
    /// Operating mode.
    pub mode: Mode,
    /// Tone squelch mode discriminant.
    pub tone_mode: ToneMode,
    /// Repeater shift direction.
    pub shift: RepeaterShift,
    /// Memory scan skip flag.
    pub skip: bool,
    /// Channel tag, without wire padding (at most 12 characters).
    pub tag: String,
}

/// Encode a [`ChannelFrame`] into the 38-character `MT` payload.
pub fn encode_channel_payload(frame: &ChannelFrame) -> String {
    let mut payload = String::with_capacity(CHANNEL_PAYLOAD_LEN);
    payload.push_str(&format!("{:03}", frame.channel));
    payload.push_str(&format!("{:09}", frame.freq_hz));
    payload.push_str(&format!("{:+05}", frame.clar_hz));
    payload.push(if frame.rx_clar { '1' } else { '0' });
    payload.push(if frame.tx_clar { '1' } else { '0' });
    payload.push(mode_to_code(frame.mode));
    payload.push('0');
    payload.push(tone_mode_to_code(frame.tone_mode));
    payload.push_str("00");
    payload.push(shift_to_code(frame.shift));
    payload.push(if frame.skip { '1' } else { '0' });
    payload.push_str(&format!("{:<12}", frame.tag));
    debug_assert_eq!(payload.len(), CHANNEL_PAYLOAD_LEN);
    payload
}

/// Decode the 38-character data portion of an `MT` reply.
///
/// Fails with [`Error::Protocol`] naming the offending field on any
/// layout mismatch; never substitutes a default. The two reserved
/// positions are not interpreted.
pub fn parse_channel_reply(data: &str) -> Result<ChannelFrame> {
    if data.len() != CHANNEL_PAYLOAD_LEN || !data.is_ascii() {
        return Err(Error::Protocol(format!(
            "expected {CHANNEL_PAYLOAD_LEN} ASCII characters for MT reply, got {} in {data:?}",
            data.len()
        )));
    }

    let channel: u16 = parse_digits(&data[0..3], "channel number")?;
    let freq_hz: u64 = parse_digits(&data[3..12], "frequency")?;

    let clar_sign = match &data[12..13] {
        "+" => 1i32,
        "-" => -1i32,
        other => {
            return Err(Error::Protocol(format!(
                "expected + or - for clarifier sign, got {other:?}"
            )));
        }
    };
    let clar_abs: i32 = parse_digits(&data[13..17], "clarifier offset")?;

    let bytes = data.as_bytes();
    let rx_clar = flag_from_code(bytes[17] as char, "RX clarifier flag")?;
    let tx_clar = flag_from_code(bytes[18] as char, "TX clarifier flag")?;
    let mode = mode_from_code(bytes[19] as char)?;
    let tone_mode = tone_mode_from_code(bytes[21] as char)?;
    let shift = shift_from_code(bytes[24] as char)?;
    let skip = flag_from_code(bytes[25] as char, "scan skip flag")?;

    let tag_field = &data[26..38];
    if tag_field.chars().any(|c| !(' '..='~').contains(&c)) {
        return Err(Error::Protocol(format!(
            "tag contains non-printable characters: {tag_field:?}"
        )));
    }

    Ok(ChannelFrame {
        channel,
        freq_hz,
        clar_hz: clar_sign * clar_abs,
        rx_clar,
        tx_clar,
        mode,
        tone_mode,
        shift,
        skip,
        tag: tag_field.trim_end().to_string(),
    })
}

fn parse_digits<T: std::str::FromStr>(s: &str, field: &str) -> Result<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Protocol(format!(
            "expected {} digits for {field}, got {s:?}",
            s.len()
        )));
    }
    s.parse()
        .map_err(|_| Error::Protocol(format!("invalid {field}: {s:?}")))
}

// ---------------------------------------------------------------
// Command builders
// ---------------------------------------------------------------

/// Build a "read memory channel" command (`MT{ch:03};`).
pub fn cmd_read_channel(channel: u16) -> Vec<u8> {
    encode_command("MT", &format!("{channel:03}"))
}

/// Build a "write memory channel" command (`MT` + 38-character payload).
pub fn cmd_write_channel(frame: &ChannelFrame) -> Vec<u8> {
    encode_command("MT", &encode_channel_payload(frame))
}

/// Build a "select memory channel" command (`MC{ch:03};`).
pub fn cmd_select_channel(channel: u16) -> Vec<u8> {
    encode_command("MC", &format!("{channel:03}"))
}

/// Build a "read CTCSS tone" command (`CN00;`).
///
/// Addresses the currently selected memory channel.
pub fn cmd_read_ctcss() -> Vec<u8> {
    encode_command("CN", "00")
}

/// Build a "set CTCSS tone" command (`CN00{index:03};`).
pub fn cmd_set_ctcss(tone: CtcssTone) -> Vec<u8> {
    encode_command("CN", &format!("00{}", tables::ctcss_wire_index(tone)))
}

/// Build a "read DCS code" command (`CN01;`).
pub fn cmd_read_dcs() -> Vec<u8> {
    encode_command("CN", "01")
}

/// Build a "set DCS code" command (`CN01{index:03};`).
pub fn cmd_set_dcs(code: DcsCode) -> Vec<u8> {
    encode_command("CN", &format!("01{}", tables::dcs_wire_index(code)))
}

/// Build a "set RX clarifier" command (`RT0;` / `RT1;`).
///
/// The `MT` write can turn the clarifier on but not off; only `RT0;`
/// clears it, so restore always sends this explicitly.
pub fn cmd_set_rx_clarifier(on: bool) -> Vec<u8> {
    encode_command("RT", if on { "1" } else { "0" })
}

/// Build a "set TX clarifier" command (`XT0;` / `XT1;`).
pub fn cmd_set_tx_clarifier(on: bool) -> Vec<u8> {
    encode_command("XT", if on { "1" } else { "0" })
}

/// Build a "read menu item" command (`EX{item:03};`).
pub fn cmd_read_menu_item(item: u16) -> Vec<u8> {
    encode_command("EX", &format!("{item:03}"))
}

/// Build a "write menu item" command (`EX{item:03}{value};`).
pub fn cmd_write_menu_item(item: u16, value: &str) -> Vec<u8> {
    encode_command("EX", &format!("{item:03}{value}"))
}

// ---------------------------------------------------------------
// Reply parsers
// ---------------------------------------------------------------

/// Parse the data portion of a `CN00` reply into a CTCSS tone.
pub fn parse_ctcss_reply(data: &str) -> Result<CtcssTone> {
    let index = strip_cn_selector(data, "00", "CTCSS")?;
    tables::ctcss_from_wire(index)
}

/// Parse the data portion of a `CN01` reply into a DCS code.
pub fn parse_dcs_reply(data: &str) -> Result<DcsCode> {
    let index = strip_cn_selector(data, "01", "DCS")?;
    tables::dcs_from_wire(index)
}

fn strip_cn_selector<'a>(data: &'a str, selector: &str, what: &str) -> Result<&'a str> {
    if data.len() != 5 {
        return Err(Error::Protocol(format!(
            "expected 5 characters for {what} reply, got {} in {data:?}",
            data.len()
        )));
    }
    data.strip_prefix(selector).ok_or_else(|| {
        Error::Protocol(format!(
            "expected {what} selector {selector:?}, got {:?}",
            &data[..2]
        ))
    })
}

/// Parse the data portion of an `EX` reply into (item number, value).
///
/// The value's domain check is the menu model's job; here it only has to
/// be non-empty printable ASCII.
pub fn parse_menu_reply(data: &str) -> Result<(u16, String)> {
    if data.len() < 4 {
        return Err(Error::Protocol(format!(
            "EX reply too short for item number and value: {data:?}"
        )));
    }
    let item: u16 = parse_digits(&data[0..3], "menu item number")?;
    let value = &data[3..];
    if !value.chars().all(|c| ('!'..='~').contains(&c)) {
        return Err(Error::Protocol(format!(
            "menu value contains non-printable characters: {value:?}"
        )));
    }
    Ok((item, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft991util_core::types::ALL_MODES;

    fn simplex_fm(channel: u16) -> ChannelFrame {
        ChannelFrame {
            channel,
            freq_hz: 146_520_000,
            clar_hz: 0,
            rx_clar: false,
            tx_clar: false,
            mode: Mode::FM,
            tone_mode: ToneMode::Off,
            shift: RepeaterShift::Off,
            skip: false,
            tag: "CALL".to_string(),
        }
    }

    // ---------------------------------------------------------------
    // Mnemonic table
    // ---------------------------------------------------------------

    #[test]
    fn mnemonic_tags() {
        assert_eq!(Mnemonic::MemoryWithTag.tag(), "MT");
        assert_eq!(Mnemonic::MemorySelect.tag(), "MC");
        assert_eq!(Mnemonic::ToneFrequency.tag(), "CN");
        assert_eq!(Mnemonic::DcsSelection.tag(), "CN");
        assert_eq!(Mnemonic::RxClarifier.tag(), "RT");
        assert_eq!(Mnemonic::TxClarifier.tag(), "XT");
        assert_eq!(Mnemonic::MenuItem.tag(), "EX");
    }

    #[test]
    fn mnemonic_tags_are_two_uppercase_letters() {
        for m in ALL_MNEMONICS {
            let tag = m.tag();
            assert_eq!(tag.len(), 2);
            assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    // ---------------------------------------------------------------
    // MT payload encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_simplex_fm_channel() {
        let payload = encode_channel_payload(&simplex_fm(3));
        assert_eq!(payload, "003146520000+0000004000000CALL        ");
        assert_eq!(payload.len(), CHANNEL_PAYLOAD_LEN);
    }

    #[test]
    fn encode_repeater_channel_with_tone() {
        let frame = ChannelFrame {
            channel: 98,
            freq_hz: 146_520_000,
            clar_hz: 1234,
            rx_clar: true,
            tx_clar: true,
            mode: Mode::FM,
            tone_mode: ToneMode::CtcssEnc,
            shift: RepeaterShift::Plus,
            skip: false,
            tag: "KA7JLO".to_string(),
        };
        let payload = encode_channel_payload(&frame);
        assert_eq!(payload, "098146520000+1234114020010KA7JLO      ");
    }

    #[test]
    fn encode_negative_clarifier() {
        let mut frame = simplex_fm(5);
        frame.clar_hz = -50;
        frame.rx_clar = true;
        let payload = encode_channel_payload(&frame);
        assert_eq!(&payload[12..17], "-0050");
    }

    #[test]
    fn encode_hf_channel_zero_pads_frequency() {
        let mut frame = simplex_fm(1);
        frame.freq_hz = 7_074_000;
        frame.mode = Mode::DataUsb;
        let payload = encode_channel_payload(&frame);
        assert_eq!(&payload[3..12], "007074000");
        assert_eq!(payload.as_bytes()[19], b'C');
    }

    #[test]
    fn encode_skip_flag() {
        let mut frame = simplex_fm(7);
        frame.skip = true;
        let payload = encode_channel_payload(&frame);
        assert_eq!(payload.as_bytes()[25], b'1');
    }

    #[test]
    fn cmd_write_channel_is_terminated_mt_frame() {
        let cmd = cmd_write_channel(&simplex_fm(3));
        assert!(cmd.starts_with(b"MT003"));
        assert!(cmd.ends_with(b";"));
        assert_eq!(cmd.len(), 2 + CHANNEL_PAYLOAD_LEN + 1);
    }

    // ---------------------------------------------------------------
    // MT payload decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_simplex_fm_channel() {
        let frame = parse_channel_reply("003146520000+0000004000000CALL        ").unwrap();
        assert_eq!(frame, simplex_fm(3));
    }

    #[test]
    fn decode_wrong_length_rejected() {
        let err = parse_channel_reply("003146520000").unwrap_err();
        assert!(err.to_string().contains("38"));
    }

    #[test]
    fn decode_bad_frequency_named() {
        let err = parse_channel_reply("0031465A0000+0000004000000CALL        ").unwrap_err();
        assert!(err.to_string().contains("frequency"), "{err}");
    }

    #[test]
    fn decode_bad_clarifier_sign_named() {
        let err = parse_channel_reply("003146520000*0000004000000CALL        ").unwrap_err();
        assert!(err.to_string().contains("clarifier sign"), "{err}");
    }

    #[test]
    fn decode_unknown_mode_code_named() {
        let err = parse_channel_reply("003146520000+000000F000000CALL        ").unwrap_err();
        assert!(err.to_string().contains("mode code"), "{err}");
    }

    #[test]
    fn decode_unknown_tone_mode_named() {
        let err = parse_channel_reply("003146520000+0000004090000CALL        ").unwrap_err();
        assert!(err.to_string().contains("tone squelch"), "{err}");
    }

    #[test]
    fn decode_unknown_shift_named() {
        let err = parse_channel_reply("003146520000+0000004000090CALL        ").unwrap_err();
        assert!(err.to_string().contains("shift"), "{err}");
    }

    #[test]
    fn decode_trims_tag_padding() {
        let frame = parse_channel_reply("017029600000+0000005040000BCB         ").unwrap();
        assert_eq!(frame.tag, "BCB");
        assert_eq!(frame.mode, Mode::AM);
        assert_eq!(frame.tone_mode, ToneMode::DcsEncDec);
    }

    // ---------------------------------------------------------------
    // Round-trip law: decode(encode(fields)) == fields
    // ---------------------------------------------------------------

    #[test]
    fn channel_round_trip_every_mode() {
        for &mode in ALL_MODES {
            let mut frame = simplex_fm(42);
            frame.mode = mode;
            let decoded = parse_channel_reply(&encode_channel_payload(&frame)).unwrap();
            assert_eq!(decoded, frame, "round-trip failed for {mode}");
        }
    }

    #[test]
    fn channel_round_trip_clarifier_extremes() {
        for clar in [-9999, -1, 0, 1, 9999] {
            let mut frame = simplex_fm(117);
            frame.clar_hz = clar;
            frame.rx_clar = clar != 0;
            let decoded = parse_channel_reply(&encode_channel_payload(&frame)).unwrap();
            assert_eq!(decoded, frame, "round-trip failed for clarifier {clar}");
        }
    }

    #[test]
    fn channel_round_trip_tone_modes_and_shifts() {
        let tone_modes = [
            ToneMode::Off,
            ToneMode::CtcssEncDec,
            ToneMode::CtcssEnc,
            ToneMode::Dcs,
            ToneMode::DcsEncDec,
        ];
        let shifts = [RepeaterShift::Off, RepeaterShift::Plus, RepeaterShift::Minus];
        for tone_mode in tone_modes {
            for shift in shifts {
                let mut frame = simplex_fm(99);
                frame.tone_mode = tone_mode;
                frame.shift = shift;
                frame.skip = true;
                let decoded = parse_channel_reply(&encode_channel_payload(&frame)).unwrap();
                assert_eq!(decoded, frame);
            }
        }
    }

    #[test]
    fn channel_round_trip_empty_tag() {
        let mut frame = simplex_fm(1);
        frame.tag = String::new();
        let decoded = parse_channel_reply(&encode_channel_payload(&frame)).unwrap();
        assert_eq!(decoded, frame);
    }

    // ---------------------------------------------------------------
    // MC / RT / XT
    // ---------------------------------------------------------------

    #[test]
    fn cmd_select_channel_bytes() {
        assert_eq!(cmd_select_channel(3), b"MC003;");
        assert_eq!(cmd_select_channel(117), b"MC117;");
    }

    #[test]
    fn cmd_clarifier_bytes() {
        assert_eq!(cmd_set_rx_clarifier(true), b"RT1;");
        assert_eq!(cmd_set_rx_clarifier(false), b"RT0;");
        assert_eq!(cmd_set_tx_clarifier(true), b"XT1;");
        assert_eq!(cmd_set_tx_clarifier(false), b"XT0;");
    }

    // ---------------------------------------------------------------
    // CN (CTCSS / DCS)
    // ---------------------------------------------------------------

    #[test]
    fn cmd_read_tone_bytes() {
        assert_eq!(cmd_read_ctcss(), b"CN00;");
        assert_eq!(cmd_read_dcs(), b"CN01;");
    }

    #[test]
    fn cmd_set_ctcss_bytes() {
        let tone = CtcssTone::from_tenths(1273).unwrap();
        assert_eq!(cmd_set_ctcss(tone), b"CN00019;");
    }

    #[test]
    fn cmd_set_dcs_bytes() {
        let code = DcsCode::from_code(115).unwrap();
        assert_eq!(cmd_set_dcs(code), b"CN01017;");
    }

    #[test]
    fn ctcss_reply_round_trip() {
        let tone = CtcssTone::from_tenths(885).unwrap();
        let cmd = cmd_set_ctcss(tone);
        // The reply data is the command payload (tag and terminator stripped).
        let data = std::str::from_utf8(&cmd[2..cmd.len() - 1]).unwrap();
        assert_eq!(parse_ctcss_reply(data).unwrap(), tone);
    }

    #[test]
    fn dcs_reply_round_trip() {
        let code = DcsCode::from_code(445).unwrap();
        let cmd = cmd_set_dcs(code);
        let data = std::str::from_utf8(&cmd[2..cmd.len() - 1]).unwrap();
        assert_eq!(parse_dcs_reply(data).unwrap(), code);
    }

    #[test]
    fn ctcss_reply_wrong_selector_rejected() {
        let err = parse_ctcss_reply("01012").unwrap_err();
        assert!(err.to_string().contains("selector"), "{err}");
    }

    #[test]
    fn ctcss_reply_wrong_length_rejected() {
        assert!(parse_ctcss_reply("0001").is_err());
        assert!(parse_ctcss_reply("000123").is_err());
    }

    // ---------------------------------------------------------------
    // EX (menu)
    // ---------------------------------------------------------------

    #[test]
    fn cmd_read_menu_item_bytes() {
        assert_eq!(cmd_read_menu_item(31), b"EX031;");
        assert_eq!(cmd_read_menu_item(153), b"EX153;");
    }

    #[test]
    fn cmd_write_menu_item_bytes() {
        assert_eq!(cmd_write_menu_item(31, "5"), b"EX0315;");
        assert_eq!(cmd_write_menu_item(62, "1500"), b"EX0621500;");
    }

    #[test]
    fn menu_reply_round_trip() {
        let cmd = cmd_write_menu_item(87, "0570");
        let data = std::str::from_utf8(&cmd[2..cmd.len() - 1]).unwrap();
        let (item, value) = parse_menu_reply(data).unwrap();
        assert_eq!(item, 87);
        assert_eq!(value, "0570");
    }

    #[test]
    fn menu_reply_too_short_rejected() {
        assert!(parse_menu_reply("087").is_err());
        assert!(parse_menu_reply("").is_err());
    }

    #[test]
    fn menu_reply_bad_item_rejected() {
        let err = parse_menu_reply("08A5").unwrap_err();
        assert!(err.to_string().contains("menu item number"), "{err}");
    }
}
