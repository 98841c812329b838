//! The bulk transfer orchestrator.
//!
//! Drives the [`Ft991`] handle sequentially over a channel or menu-item
//! range. Each record moves through an explicit state machine:
//!
//! ```text
//! Idle -> Sending -> AwaitingResponse -> { Applied | Retrying | Failed }
//! ```
//!
//! `Sending` and `AwaitingResponse` are spanned by one rig exchange (a
//! single send plus one bounded read to the terminator). A transient
//! failure (timeout, undecodable reply) moves to `Retrying` and
//! re-issues the same command until the policy's attempt budget is
//! exhausted; everything else -- the rig's `?;` reject, a lost
//! connection -- is `Failed` immediately.
//!
//! Cancellation is honored at each `Idle -> Sending` transition: a
//! cancelled operation stops issuing commands, leaves the transport
//! open, and reports how many records completed.
//!
//! In dry-run mode all validation and encoding runs and each frame that
//! would be sent is logged, but nothing touches the transport.

use std::ops::RangeInclusive;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use ft991util_cat::commands::{self, ToneMode};
use ft991util_cat::memory::{CHANNEL_MAX, CHANNEL_MIN, MemoryChannel};
use ft991util_cat::menu::{MENU_ITEM_MAX, MENU_ITEM_MIN, MenuSetting};
use ft991util_cat::rig::Ft991;
use ft991util_core::error::{Error, Result};
use ft991util_core::types::ToneSquelch;

/// Retry policy for one command/response exchange.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total send attempts per command (first try included).
    pub max_attempts: u32,
    /// Base backoff between attempts; multiplied by the attempt number.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(20),
        }
    }
}

/// Configuration for one bulk operation.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Retry policy applied to every exchange.
    pub retry: RetryPolicy,
    /// Validate and encode but never touch the transport.
    pub dry_run: bool,
    /// Operator interrupt, checked at each record boundary.
    pub cancel: CancellationToken,
    /// Memory channels to scan or restore (full table by default).
    pub channel_range: RangeInclusive<u16>,
    /// Menu items to scan or restore (full table by default).
    pub menu_range: RangeInclusive<u16>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            retry: RetryPolicy::default(),
            dry_run: false,
            cancel: CancellationToken::new(),
            channel_range: CHANNEL_MIN..=CHANNEL_MAX,
            menu_range: MENU_ITEM_MIN..=MENU_ITEM_MAX,
        }
    }
}

/// Outcome of one bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Records applied (restore) or collected (backup).
    pub completed: usize,
    /// Records skipped (read-only menu items on restore).
    pub skipped: usize,
    /// Records in the operation's scope.
    pub total: usize,
    /// Whether the operation stopped early on operator interrupt.
    pub cancelled: bool,
}

impl TransferReport {
    fn new(total: usize) -> Self {
        TransferReport {
            completed: 0,
            skipped: 0,
            total,
            cancelled: false,
        }
    }
}

/// Per-record progress through one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordState {
    Idle,
    Sending,
    AwaitingResponse,
    Applied,
    Retrying,
    Failed,
}

/// Drive one rig exchange through the record state machine.
///
/// `$op` is re-evaluated on every attempt, so retries re-issue the same
/// command. The awaited rig call performs the send and then blocks on
/// the reply, covering `Sending -> AwaitingResponse`. Breaks with the
/// final `Result`.
macro_rules! exchange {
    ($policy:expr, $record:expr, $what:expr, $op:expr) => {{
        let mut state = RecordState::Idle;
        let mut attempts: u32 = 0;
        trace!(record = %$record, what = $what, ?state, "exchange start");
        loop {
            attempts += 1;
            state = RecordState::Sending;
            trace!(record = %$record, what = $what, attempts, ?state, "issuing command");
            state = RecordState::AwaitingResponse;
            trace!(record = %$record, what = $what, ?state, "waiting for reply");
            match $op.await {
                Ok(value) => {
                    state = RecordState::Applied;
                    trace!(record = %$record, what = $what, attempts, ?state, "exchange done");
                    break Ok(value);
                }
                Err(e) if e.is_transient() && attempts < $policy.max_attempts => {
                    state = RecordState::Retrying;
                    debug!(record = %$record, what = $what, attempts, error = %e, ?state, "retrying");
                    tokio::time::sleep($policy.backoff * attempts).await;
                }
                Err(e) => {
                    state = RecordState::Failed;
                    warn!(record = %$record, what = $what, attempts, error = %e, ?state, "exchange failed");
                    break Err(e);
                }
            }
        }
    }};
}

fn record_error(record: String, cause: Error) -> Error {
    Error::Record {
        record,
        cause: Box::new(cause),
    }
}

fn preview(frame: &[u8]) {
    info!(frame = %String::from_utf8_lossy(frame), "dry run: would send");
}

// ---------------------------------------------------------------------------
// Memory backup (device -> records)
// ---------------------------------------------------------------------------

/// Scan the memory table in ascending channel order.
///
/// Unprogrammed locations are skipped. Each programmed channel is read
/// (`MT`), its tone value fetched if its tone squelch mode calls for one
/// (`MC` + `CN`), validated, and appended. A failure at any channel
/// aborts the whole scan; the caller writes the file only on a complete,
/// uncancelled scan.
pub async fn scan_memory(
    rig: &mut Ft991,
    opts: &TransferOptions,
) -> Result<(Vec<MemoryChannel>, TransferReport)> {
    let mut channels = Vec::new();
    let mut report = TransferReport::new(opts.channel_range.clone().count());

    for ch in opts.channel_range.clone() {
        if opts.cancel.is_cancelled() {
            info!(completed = report.completed, "memory backup cancelled");
            report.cancelled = true;
            return Ok((channels, report));
        }
        let record = format!("channel {ch}");

        if opts.dry_run {
            preview(&commands::cmd_read_channel(ch));
            continue;
        }

        let frame = exchange!(opts.retry, record, "read channel", rig.read_channel(ch))
            .map_err(|e| record_error(record.clone(), e))?;
        let frame = match frame {
            Some(frame) => frame,
            None => {
                debug!(record = %record, "location unprogrammed, skipping");
                continue;
            }
        };

        let tone = read_tone_value(rig, opts, &record, ch, frame.tone_mode).await?;
        let channel = MemoryChannel::from_device(&frame, tone);

        // Catches device-side corruption before it lands in the file.
        channel.validate().map_err(Error::Validation)?;

        channels.push(channel);
        report.completed += 1;
    }

    info!(records = report.completed, "memory backup scan complete");
    Ok((channels, report))
}

/// Fetch the tone squelch value the channel's mode calls for.
async fn read_tone_value(
    rig: &mut Ft991,
    opts: &TransferOptions,
    record: &str,
    ch: u16,
    tone_mode: ToneMode,
) -> Result<ToneSquelch> {
    if tone_mode == ToneMode::Off {
        return Ok(ToneSquelch::Off);
    }

    exchange!(opts.retry, record, "select channel", rig.select_channel(ch))
        .map_err(|e| record_error(record.to_string(), e))?;

    let tone = match tone_mode {
        ToneMode::Off => unreachable!(),
        ToneMode::CtcssEncDec | ToneMode::CtcssEnc => {
            let tone = exchange!(opts.retry, record, "read CTCSS tone", rig.read_ctcss())
                .map_err(|e| record_error(record.to_string(), e))?;
            if tone_mode == ToneMode::CtcssEncDec {
                ToneSquelch::CtcssEncDec(tone)
            } else {
                ToneSquelch::CtcssEnc(tone)
            }
        }
        ToneMode::Dcs | ToneMode::DcsEncDec => {
            let code = exchange!(opts.retry, record, "read DCS code", rig.read_dcs())
                .map_err(|e| record_error(record.to_string(), e))?;
            if tone_mode == ToneMode::Dcs {
                ToneSquelch::Dcs(code)
            } else {
                ToneSquelch::DcsEncDec(code)
            }
        }
    };
    Ok(tone)
}

// ---------------------------------------------------------------------------
// Memory restore (records -> device)
// ---------------------------------------------------------------------------

/// Restore memory channels in ascending channel order.
///
/// Every record is validated before the first command is issued; an
/// invalid set means zero device traffic. A mid-stream device failure
/// surfaces as [`Error::PartialRestore`]: the device has no transaction
/// primitive, so earlier channels stay restored and later ones keep
/// their prior contents.
pub async fn restore_memory(
    rig: &mut Ft991,
    channels: &[MemoryChannel],
    opts: &TransferOptions,
) -> Result<TransferReport> {
    validate_all(channels.iter().map(|ch| ch.validate()))?;

    let mut report = TransferReport::new(channels.len());

    for channel in channels {
        if opts.cancel.is_cancelled() {
            info!(completed = report.completed, "memory restore cancelled");
            report.cancelled = true;
            return Ok(report);
        }
        let record = format!("channel {}", channel.channel);

        restore_one_channel(rig, channel, opts, &record)
            .await
            .map_err(|cause| Error::PartialRestore {
                applied: report.completed,
                total: report.total,
                record: record.clone(),
                cause: Box::new(cause),
            })?;

        report.completed += 1;
    }

    info!(records = report.completed, "memory restore complete");
    Ok(report)
}

async fn restore_one_channel(
    rig: &mut Ft991,
    channel: &MemoryChannel,
    opts: &TransferOptions,
    record: &str,
) -> Result<()> {
    let frame = channel.to_frame();
    let write_cmd = commands::cmd_write_channel(&frame);
    let select_cmd = commands::cmd_select_channel(channel.channel);

    if opts.dry_run {
        preview(&write_cmd);
        preview(&select_cmd);
        match channel.tone {
            ToneSquelch::Off => {}
            ToneSquelch::CtcssEncDec(t) | ToneSquelch::CtcssEnc(t) => {
                preview(&commands::cmd_set_ctcss(t));
            }
            ToneSquelch::Dcs(c) | ToneSquelch::DcsEncDec(c) => {
                preview(&commands::cmd_set_dcs(c));
            }
        }
        preview(&commands::cmd_set_rx_clarifier(channel.clar_hz != 0));
        preview(&commands::cmd_set_tx_clarifier(false));
        return Ok(());
    }

    exchange!(opts.retry, record, "write channel", rig.write_channel(&frame))?;
    exchange!(opts.retry, record, "select channel", rig.select_channel(channel.channel))?;

    match channel.tone {
        ToneSquelch::Off => {}
        ToneSquelch::CtcssEncDec(t) | ToneSquelch::CtcssEnc(t) => {
            exchange!(opts.retry, record, "set CTCSS tone", rig.write_ctcss(t))?;
        }
        ToneSquelch::Dcs(c) | ToneSquelch::DcsEncDec(c) => {
            exchange!(opts.retry, record, "set DCS code", rig.write_dcs(c))?;
        }
    }

    // MT can switch the clarifier on but only RT0;/XT0; switch it off,
    // so both states are always sent explicitly.
    let clar_on = channel.clar_hz != 0;
    exchange!(opts.retry, record, "set RX clarifier", rig.set_rx_clarifier(clar_on))?;
    exchange!(opts.retry, record, "set TX clarifier", rig.set_tx_clarifier(false))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Menu backup / restore
// ---------------------------------------------------------------------------

/// Read the whole menu table in ascending item order.
pub async fn scan_menu(
    rig: &mut Ft991,
    opts: &TransferOptions,
) -> Result<(Vec<MenuSetting>, TransferReport)> {
    let mut settings = Vec::new();
    let mut report = TransferReport::new(opts.menu_range.clone().count());

    for item in opts.menu_range.clone() {
        if opts.cancel.is_cancelled() {
            info!(completed = report.completed, "menu backup cancelled");
            report.cancelled = true;
            return Ok((settings, report));
        }
        let record = format!("menu item {item}");

        if opts.dry_run {
            preview(&commands::cmd_read_menu_item(item));
            continue;
        }

        let setting = exchange!(opts.retry, record, "read menu item", rig.read_menu_item(item))
            .map_err(|e| record_error(record.clone(), e))?;
        setting.validate().map_err(Error::Validation)?;

        settings.push(setting);
        report.completed += 1;
    }

    info!(records = report.completed, "menu backup scan complete");
    Ok((settings, report))
}

/// Restore menu settings in ascending item order.
///
/// The whole set is validated before any device traffic. Read-only
/// items (the radio ID) are skipped, not written -- the rig rejects
/// writes to them.
pub async fn restore_menu(
    rig: &mut Ft991,
    settings: &[MenuSetting],
    opts: &TransferOptions,
) -> Result<TransferReport> {
    validate_all(settings.iter().map(|s| s.validate()))?;

    let mut report = TransferReport::new(settings.len());

    for setting in settings {
        if opts.cancel.is_cancelled() {
            info!(completed = report.completed, "menu restore cancelled");
            report.cancelled = true;
            return Ok(report);
        }
        let record = format!("menu item {}", setting.item);

        if !setting.is_writable() {
            debug!(record = %record, "read-only item, skipping");
            report.skipped += 1;
            continue;
        }

        let cmd = commands::cmd_write_menu_item(setting.item, &setting.value);
        if opts.dry_run {
            preview(&cmd);
            report.completed += 1;
            continue;
        }

        exchange!(opts.retry, record, "write menu item", rig.write_menu_item(setting))
            .map_err(|cause| Error::PartialRestore {
                applied: report.completed,
                total: report.total,
                record: record.clone(),
                cause: Box::new(cause),
            })?;

        report.completed += 1;
    }

    info!(
        records = report.completed,
        skipped = report.skipped,
        "menu restore complete"
    );
    Ok(report)
}

/// Collect every validation failure, reporting them together.
fn validate_all(
    results: impl Iterator<Item = std::result::Result<(), ft991util_core::error::FieldViolation>>,
) -> Result<()> {
    let violations: Vec<_> = results.filter_map(|r| r.err()).collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidBackup(violations))
    }
}
