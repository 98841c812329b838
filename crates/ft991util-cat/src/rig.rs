//! The [`Ft991`] device handle.
//!
//! Ties the frame codec ([`protocol`]) and command codec ([`commands`])
//! to a [`Transport`] to produce typed channel, tone, and menu
//! operations. Every exchange takes `&mut self`, so a second in-flight
//! request is unrepresentable -- the CAT protocol is strictly
//! request-then-response.
//!
//! Each operation here is a single attempt: one send, one bounded read
//! to the `;` terminator, one decode. The bulk transfer orchestrator
//! owns the retry policy and drives these operations through its
//! per-record state machine.

use std::time::Duration;
use tokio::time::Instant;

use ft991util_core::error::{Error, Result};
use ft991util_core::transport::Transport;
use ft991util_core::types::{CtcssTone, DcsCode};

use crate::commands::{self, ChannelFrame, Mnemonic};
use crate::menu::MenuSetting;
use crate::protocol::{self, DecodeResult};

/// A connected FT-991, controlled over CAT.
///
/// Constructed via [`Ft991Builder`](crate::builder::Ft991Builder). The
/// transport is owned exclusively and released when the handle is
/// dropped or [`close()`](Ft991::close) is called.
pub struct Ft991 {
    transport: Box<dyn Transport>,
    command_timeout: Duration,
}

impl std::fmt::Debug for Ft991 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ft991")
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

impl Ft991 {
    pub(crate) fn new(transport: Box<dyn Transport>, command_timeout: Duration) -> Self {
        Ft991 {
            transport,
            command_timeout,
        }
    }

    /// Send a command that answers with a reply frame and decode the
    /// reply's data portion.
    ///
    /// Reads from the transport until the `;` terminator arrives or the
    /// command timeout elapses. A reply whose tag does not match the
    /// command's mnemonic, and a reply that cannot be framed, both fail
    /// with [`Error::Protocol`]; the rig's `?;` answer fails with
    /// [`Error::Rejected`].
    async fn execute(&mut self, cmd: &[u8], mnemonic: Mnemonic) -> Result<String> {
        tracing::trace!(cmd = %String::from_utf8_lossy(cmd), "CAT command");
        self.transport.send(cmd).await?;

        let deadline = Instant::now() + self.command_timeout;
        let mut buf = [0u8; 256];
        let mut reply = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout);
            }

            match self.transport.receive(&mut buf, remaining).await {
                Ok(n) => {
                    reply.extend_from_slice(&buf[..n]);
                    match protocol::decode_response(&reply) {
                        DecodeResult::Response { prefix, data, .. } => {
                            tracing::trace!(%prefix, %data, "CAT reply");
                            if prefix == mnemonic.tag() {
                                return Ok(data);
                            }
                            return Err(Error::Protocol(format!(
                                "expected {} reply, got {prefix}{data}",
                                mnemonic.tag()
                            )));
                        }
                        DecodeResult::Reject(_) => return Err(Error::Rejected),
                        DecodeResult::Incomplete => {}
                    }
                }
                Err(Error::Timeout) => return Err(Error::Timeout),
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a set command (no reply on success).
    ///
    /// After sending, drains the line briefly to catch a `?;` reject
    /// without adding meaningful latency; silence is success.
    async fn execute_set(&mut self, cmd: &[u8]) -> Result<()> {
        tracing::trace!(cmd = %String::from_utf8_lossy(cmd), "CAT set command");
        self.transport.send(cmd).await?;

        let drain_timeout = Duration::from_millis(50);
        let mut buf = [0u8; 256];
        let mut drained = Vec::new();

        loop {
            match self.transport.receive(&mut buf, drain_timeout).await {
                Ok(n) => {
                    drained.extend_from_slice(&buf[..n]);
                    match protocol::decode_response(&drained) {
                        DecodeResult::Reject(_) => return Err(Error::Rejected),
                        // Echo bytes; consumed, done.
                        DecodeResult::Response { .. } => return Ok(()),
                        DecodeResult::Incomplete => {}
                    }
                }
                Err(Error::Timeout) => {
                    if let DecodeResult::Reject(_) = protocol::decode_response(&drained) {
                        return Err(Error::Rejected);
                    }
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    // -------------------------------------------------------------------
    // Memory channels
    // -------------------------------------------------------------------

    /// Read one memory channel.
    ///
    /// Returns `Ok(None)` for an unprogrammed location (the rig answers
    /// `?;` for those).
    pub async fn read_channel(&mut self, channel: u16) -> Result<Option<ChannelFrame>> {
        let cmd = commands::cmd_read_channel(channel);
        let data = match self.execute(&cmd, Mnemonic::MemoryWithTag).await {
            Ok(data) => data,
            Err(Error::Rejected) => return Ok(None),
            Err(e) => return Err(e),
        };
        let frame = commands::parse_channel_reply(&data)?;
        if frame.channel != channel {
            return Err(Error::Protocol(format!(
                "MT reply for channel {} while reading channel {channel}",
                frame.channel
            )));
        }
        Ok(Some(frame))
    }

    /// Write one memory channel.
    pub async fn write_channel(&mut self, frame: &ChannelFrame) -> Result<()> {
        self.execute_set(&commands::cmd_write_channel(frame)).await
    }

    /// Select the current memory channel (`MC`); tone reads and writes
    /// address the selected channel.
    pub async fn select_channel(&mut self, channel: u16) -> Result<()> {
        self.execute_set(&commands::cmd_select_channel(channel)).await
    }

    // -------------------------------------------------------------------
    // Tone squelch values (for the selected channel)
    // -------------------------------------------------------------------

    /// Read the CTCSS tone of the selected channel.
    pub async fn read_ctcss(&mut self) -> Result<CtcssTone> {
        let data = self
            .execute(&commands::cmd_read_ctcss(), Mnemonic::ToneFrequency)
            .await?;
        commands::parse_ctcss_reply(&data)
    }

    /// Set the CTCSS tone of the selected channel.
    pub async fn write_ctcss(&mut self, tone: CtcssTone) -> Result<()> {
        self.execute_set(&commands::cmd_set_ctcss(tone)).await
    }

    /// Read the DCS code of the selected channel.
    pub async fn read_dcs(&mut self) -> Result<DcsCode> {
        let data = self
            .execute(&commands::cmd_read_dcs(), Mnemonic::DcsSelection)
            .await?;
        commands::parse_dcs_reply(&data)
    }

    /// Set the DCS code of the selected channel.
    pub async fn write_dcs(&mut self, code: DcsCode) -> Result<()> {
        self.execute_set(&commands::cmd_set_dcs(code)).await
    }

    /// Turn the RX clarifier on or off.
    ///
    /// `MT` can enable the clarifier but only `RT0;` disables it, so
    /// restore sends this for every channel.
    pub async fn set_rx_clarifier(&mut self, on: bool) -> Result<()> {
        self.execute_set(&commands::cmd_set_rx_clarifier(on)).await
    }

    /// Turn the TX clarifier on or off.
    pub async fn set_tx_clarifier(&mut self, on: bool) -> Result<()> {
        self.execute_set(&commands::cmd_set_tx_clarifier(on)).await
    }

    // -------------------------------------------------------------------
    // Menu items
    // -------------------------------------------------------------------

    /// Read one menu item.
    pub async fn read_menu_item(&mut self, item: u16) -> Result<MenuSetting> {
        let cmd = commands::cmd_read_menu_item(item);
        let data = self.execute(&cmd, Mnemonic::MenuItem).await?;
        let (echoed, value) = commands::parse_menu_reply(&data)?;
        if echoed != item {
            return Err(Error::Protocol(format!(
                "EX reply for item {echoed} while reading item {item}"
            )));
        }
        Ok(MenuSetting::new(item, value))
    }

    /// Write one menu item.
    pub async fn write_menu_item(&mut self, setting: &MenuSetting) -> Result<()> {
        self.execute_set(&commands::cmd_write_menu_item(
            setting.item,
            &setting.value,
        ))
        .await
    }

    // -------------------------------------------------------------------
    // Pass-through
    // -------------------------------------------------------------------

    /// Forward one raw line and return whatever comes back, verbatim.
    ///
    /// Reads until the `;` terminator or until `timeout` elapses and
    /// returns everything received -- including partial or malformed
    /// data, and including the terminator. No validation, no retry;
    /// this is the debugging path, not a transfer path.
    pub async fn raw_exchange(&mut self, line: &str, timeout: Duration) -> Result<String> {
        self.transport.send(line.as_bytes()).await?;

        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 256];
        let mut reply = Vec::new();

        loop {
            if reply.contains(&protocol::TERMINATOR) {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.transport.receive(&mut buf, remaining).await {
                Ok(n) => reply.extend_from_slice(&buf[..n]),
                Err(Error::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(String::from_utf8_lossy(&reply).into_owned())
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the underlying transport. Safe to call multiple times.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await
    }
}
