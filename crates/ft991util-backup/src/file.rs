//! Backup file codecs.
//!
//! Memory channels go to a comma-delimited file (one record per line,
//! header first) that spreadsheet applications open directly; menu
//! settings go to a `NNN,value` line format. Loading validates the whole
//! file and reports *every* invalid row with its line number, so the
//! operator fixes the file in one pass instead of one error per run.
//! Writing is all-or-nothing: the rendered file is written to a
//! temporary sibling and renamed into place.

use std::fs;
use std::path::Path;

use ft991util_cat::memory::MemoryChannel;
use ft991util_cat::menu::MenuSetting;
use ft991util_core::error::{Error, FieldViolation, Result};
use ft991util_core::types::{Mode, RepeaterShift, ToneSquelch};

/// Header line of the memory backup file.
pub const MEMORY_HEADER: &str =
    "Channel,Frequency,Mode,Offset,Shift,Tone Mode,Tone,Clarifier,Tag,Skip";

/// Number of fields in one memory record line.
const MEMORY_FIELDS: usize = 10;

// ---------------------------------------------------------------------------
// Memory channel file
// ---------------------------------------------------------------------------

/// Render a memory backup set to file contents.
pub fn render_memory_file(channels: &[MemoryChannel]) -> String {
    let mut out = String::new();
    out.push_str(MEMORY_HEADER);
    out.push('\n');
    for ch in channels {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            ch.channel,
            ch.freq_hz,
            ch.mode,
            ch.offset_hz,
            ch.shift,
            ch.tone.mode_name(),
            ch.tone.value_text(),
            ch.clar_hz,
            ch.tag,
            if ch.skip { 1 } else { 0 },
        ));
    }
    out
}

/// Parse memory backup file contents.
///
/// Every row is validated; all violations are collected and returned
/// together as [`Error::InvalidBackup`]. On success the records come
/// back sorted by ascending channel number, with duplicates rejected.
pub fn parse_memory_file(contents: &str) -> Result<Vec<MemoryChannel>> {
    let mut channels = Vec::new();
    let mut violations = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        // The first line is the header; tolerate a file without one.
        if line_no == 1 && !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        match parse_memory_line(line, line_no) {
            Ok(ch) => channels.push(ch),
            Err(v) => violations.push(v),
        }
    }

    channels.sort_by_key(|ch| ch.channel);
    for pair in channels.windows(2) {
        if pair[0].channel == pair[1].channel {
            violations.push(FieldViolation::new(
                format!("channel {}", pair[0].channel),
                "channel",
                "appears more than once in the file",
            ));
        }
    }

    if violations.is_empty() {
        Ok(channels)
    } else {
        Err(Error::InvalidBackup(violations))
    }
}

fn parse_memory_line(line: &str, line_no: usize) -> std::result::Result<MemoryChannel, FieldViolation> {
    let record = format!("line {line_no}");
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != MEMORY_FIELDS {
        return Err(FieldViolation::new(
            record,
            "record",
            format!("expected {MEMORY_FIELDS} fields, found {}", fields.len()),
        ));
    }

    let channel: u16 = parse_num(fields[0], &record, "channel")?;
    let freq_hz: u64 = parse_num(fields[1], &record, "frequency")?;
    let mode: Mode = fields[2]
        .parse()
        .map_err(|e: ft991util_core::types::ParseModeError| {
            FieldViolation::new(record.as_str(), "mode", e.to_string())
        })?;
    let offset_hz: u32 = parse_num(fields[3], &record, "offset")?;
    let shift: RepeaterShift = fields[4]
        .parse()
        .map_err(|e: String| FieldViolation::new(record.as_str(), "shift", e))?;
    let tone = ToneSquelch::from_parts(fields[5], fields[6])
        .map_err(|e| FieldViolation::new(record.as_str(), "tone", e))?;
    let clar_hz: i32 = parse_num(fields[7], &record, "clarifier")?;
    let tag = fields[8].to_string();
    let skip = match fields[9] {
        "0" => false,
        "1" => true,
        other => {
            return Err(FieldViolation::new(
                record,
                "skip",
                format!("expected 0 or 1, got {other:?}"),
            ));
        }
    };

    let channel = MemoryChannel {
        channel,
        freq_hz,
        mode,
        offset_hz,
        shift,
        tone,
        clar_hz,
        tag,
        skip,
    };

    // Domain validation, reported against the file line.
    channel.validate().map_err(|v| {
        FieldViolation::new(format!("line {line_no} ({})", v.record), v.field, v.reason)
    })?;

    Ok(channel)
}

fn parse_num<T: std::str::FromStr>(
    s: &str,
    record: &str,
    field: &'static str,
) -> std::result::Result<T, FieldViolation> {
    s.parse().map_err(|_| {
        FieldViolation::new(record, field, format!("{s:?} is not a valid number"))
    })
}

// ---------------------------------------------------------------------------
// Menu settings file
// ---------------------------------------------------------------------------

/// Render a menu backup set to file contents (`NNN,value` per line).
pub fn render_menu_file(settings: &[MenuSetting]) -> String {
    let mut out = String::new();
    for s in settings {
        out.push_str(&format!("{:03},{}\n", s.item, s.value));
    }
    out
}

/// Parse menu backup file contents.
///
/// Unknown item numbers and out-of-domain values are all collected and
/// reported together. Records come back sorted by ascending item number,
/// duplicates rejected.
pub fn parse_menu_file(contents: &str) -> Result<Vec<MenuSetting>> {
    let mut settings = Vec::new();
    let mut violations = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_menu_line(line, line_no) {
            Ok(s) => settings.push(s),
            Err(v) => violations.push(v),
        }
    }

    settings.sort_by_key(|s| s.item);
    for pair in settings.windows(2) {
        if pair[0].item == pair[1].item {
            violations.push(FieldViolation::new(
                format!("menu item {}", pair[0].item),
                "item",
                "appears more than once in the file",
            ));
        }
    }

    if violations.is_empty() {
        Ok(settings)
    } else {
        Err(Error::InvalidBackup(violations))
    }
}

fn parse_menu_line(line: &str, line_no: usize) -> std::result::Result<MenuSetting, FieldViolation> {
    let record = format!("line {line_no}");

    let (item_text, value) = line.split_once(',').ok_or_else(|| {
        FieldViolation::new(record.as_str(), "record", "expected item,value")
    })?;
    let item: u16 = parse_num(item_text.trim(), &record, "item")?;

    let setting = MenuSetting::new(item, value.trim());
    setting.validate().map_err(|v| {
        FieldViolation::new(format!("line {line_no} ({})", v.record), v.field, v.reason)
    })?;
    Ok(setting)
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Load and parse the memory backup file at `path`.
pub fn load_memory_file(path: &Path) -> Result<Vec<MemoryChannel>> {
    parse_memory_file(&fs::read_to_string(path)?)
}

/// Load and parse the menu backup file at `path`.
pub fn load_menu_file(path: &Path) -> Result<Vec<MenuSetting>> {
    parse_menu_file(&fs::read_to_string(path)?)
}

/// Write `contents` to `path` all-or-nothing: rendered to a temporary
/// sibling first, then renamed into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft991util_core::types::{CtcssTone, DcsCode};

    fn call_channel() -> MemoryChannel {
        MemoryChannel {
            channel: 3,
            freq_hz: 146_520_000,
            mode: Mode::FM,
            offset_hz: 0,
            shift: RepeaterShift::Off,
            tone: ToneSquelch::Off,
            clar_hz: 0,
            tag: "CALL".to_string(),
            skip: false,
        }
    }

    fn repeater_channel() -> MemoryChannel {
        MemoryChannel {
            channel: 98,
            freq_hz: 442_500_000,
            mode: Mode::FM,
            offset_hz: 5_000_000,
            shift: RepeaterShift::Plus,
            tone: ToneSquelch::CtcssEncDec(CtcssTone::from_tenths(1000).unwrap()),
            clar_hz: -120,
            tag: "W7AUX RPT".to_string(),
            skip: true,
        }
    }

    #[test]
    fn render_includes_header_and_rows() {
        let text = render_memory_file(&[call_channel()]);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(MEMORY_HEADER));
        assert_eq!(lines.next(), Some("3,146520000,FM,0,OFF,OFF,,0,CALL,0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn render_repeater_row() {
        let text = render_memory_file(&[repeater_channel()]);
        assert_eq!(
            text.lines().nth(1),
            Some("98,442500000,FM,5000000,+RPT,ENC/DEC,100.0 Hz,-120,W7AUX RPT,1")
        );
    }

    #[test]
    fn memory_file_round_trip() {
        let channels = vec![call_channel(), repeater_channel()];
        let parsed = parse_memory_file(&render_memory_file(&channels)).unwrap();
        assert_eq!(parsed, channels);
    }

    #[test]
    fn memory_round_trip_dcs_channel() {
        let mut ch = call_channel();
        ch.tone = ToneSquelch::DcsEncDec(DcsCode::from_code(445).unwrap());
        let parsed = parse_memory_file(&render_memory_file(&[ch.clone()])).unwrap();
        assert_eq!(parsed, vec![ch]);
    }

    #[test]
    fn parse_sorts_by_channel() {
        let mut a = call_channel();
        a.channel = 50;
        let mut b = call_channel();
        b.channel = 2;
        let text = render_memory_file(&[a, b]);
        let parsed = parse_memory_file(&text).unwrap();
        assert_eq!(parsed[0].channel, 2);
        assert_eq!(parsed[1].channel, 50);
    }

    #[test]
    fn duplicate_channels_rejected() {
        let text = render_memory_file(&[call_channel(), call_channel()]);
        match parse_memory_file(&text).unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert!(violations.iter().any(|v| v.reason.contains("more than once")));
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn every_bad_row_is_reported() {
        let text = format!(
            "{MEMORY_HEADER}\n\
             3,146520000,FM,0,OFF,OFF,,0,CALL,0\n\
             0,146520000,FM,0,OFF,OFF,,0,BADCH,0\n\
             7,999999999,FM,0,OFF,OFF,,0,BADFREQ,0\n\
             9,146520000,XSB,0,OFF,OFF,,0,BADMODE,0\n"
        );
        match parse_memory_file(&text).unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert_eq!(violations.len(), 3);
                assert!(violations[0].record.contains("line 3"));
                assert_eq!(violations[0].field, "channel");
                assert!(violations[1].record.contains("line 4"));
                assert_eq!(violations[1].field, "frequency");
                assert!(violations[2].record.contains("line 5"));
                assert_eq!(violations[2].field, "mode");
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn wrong_field_count_reported_with_line() {
        let text = format!("{MEMORY_HEADER}\n3,146520000,FM\n");
        match parse_memory_file(&text).unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].record.contains("line 2"));
                assert!(violations[0].reason.contains("expected 10 fields"));
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn tone_value_with_mode_off_rejected() {
        let text = format!("{MEMORY_HEADER}\n3,146520000,FM,0,OFF,OFF,88.5 Hz,0,CALL,0\n");
        match parse_memory_file(&text).unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert_eq!(violations[0].field, "tone");
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn nonstandard_tone_rejected() {
        let text = format!("{MEMORY_HEADER}\n3,146520000,FM,0,OFF,TONE ENC,100.1 Hz,0,CALL,0\n");
        assert!(matches!(
            parse_memory_file(&text).unwrap_err(),
            Error::InvalidBackup(_)
        ));
    }

    #[test]
    fn empty_file_parses_to_nothing() {
        assert_eq!(parse_memory_file("").unwrap(), vec![]);
        assert_eq!(parse_memory_file(MEMORY_HEADER).unwrap(), vec![]);
    }

    #[test]
    fn blank_lines_ignored() {
        let text = format!("{MEMORY_HEADER}\n\n3,146520000,FM,0,OFF,OFF,,0,CALL,0\n\n");
        assert_eq!(parse_memory_file(&text).unwrap().len(), 1);
    }

    // -------------------------------------------------------------------
    // Menu file
    // -------------------------------------------------------------------

    #[test]
    fn menu_render_and_parse_round_trip() {
        let settings = vec![
            MenuSetting::new(1, "5"),
            MenuSetting::new(62, "0300"),
            MenuSetting::new(87, "0570"),
        ];
        let text = render_menu_file(&settings);
        assert_eq!(text, "001,5\n062,0300\n087,0570\n");
        assert_eq!(parse_menu_file(&text).unwrap(), settings);
    }

    #[test]
    fn menu_unknown_item_rejected_with_line() {
        match parse_menu_file("001,5\n154,0\n").unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].record.contains("line 2"));
                assert_eq!(violations[0].field, "item");
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn menu_bad_value_rejected() {
        assert!(matches!(
            parse_menu_file("010,abc\n").unwrap_err(),
            Error::InvalidBackup(_)
        ));
    }

    #[test]
    fn menu_missing_comma_rejected() {
        match parse_menu_file("0105\n").unwrap_err() {
            Error::InvalidBackup(violations) => {
                assert!(violations[0].reason.contains("item,value"));
            }
            other => panic!("expected InvalidBackup, got {other}"),
        }
    }

    #[test]
    fn menu_duplicates_rejected() {
        assert!(matches!(
            parse_menu_file("010,1\n010,2\n").unwrap_err(),
            Error::InvalidBackup(_)
        ));
    }

    #[test]
    fn menu_parse_sorts_by_item() {
        let parsed = parse_menu_file("050,1\n002,0\n").unwrap();
        assert_eq!(parsed[0].item, 2);
        assert_eq!(parsed[1].item, 50);
    }

    // -------------------------------------------------------------------
    // Atomic write
    // -------------------------------------------------------------------

    #[test]
    fn write_atomic_creates_file_and_removes_temp() {
        let dir = std::env::temp_dir().join("ft991util-file-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mem.csv");

        write_atomic(&path, "hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!dir.join("mem.csv.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
