//! Transport trait for rig communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the
//! transceiver. Implementations exist for serial ports (the real rig) and
//! for a mock transport used in protocol tests (`ft991util-test-harness`).
//!
//! The CAT engine operates on a `Transport` rather than directly on a
//! serial port, so every command/response path can be exercised
//! deterministically without hardware.
//!
//! The CAT protocol is strictly request-then-response: callers must not
//! issue a new `send` before consuming the reply to the previous one. The
//! `Ft991` handle enforces this by taking `&mut self` for every exchange.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the rig.
///
/// Implementations handle buffering and error mapping at the physical
/// layer. Protocol-level concerns (the `;` terminator, command layouts)
/// are handled by the CAT engine that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the rig.
    ///
    /// Implementations block until all bytes have been written to the
    /// underlying transport and flushed.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the rig into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Waits up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if nothing is received within the deadline. Never blocks
    /// indefinitely.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// Safe to call multiple times. After `close()`, subsequent `send()`
    /// and `receive()` calls return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
