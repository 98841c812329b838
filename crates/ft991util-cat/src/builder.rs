//! Ft991Builder -- configuration for constructing [`Ft991`] handles.
//!
//! Separates configuration from construction so callers can set up the
//! port path, baud rate, and command timeout before the serial
//! connection is established.
//!
//! # Example
//!
//! ```no_run
//! use ft991util_cat::Ft991Builder;
//! use std::time::Duration;
//!
//! # async fn example() -> ft991util_core::Result<()> {
//! let rig = Ft991Builder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .baud_rate(9600)
//!     .command_timeout(Duration::from_millis(500))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use ft991util_core::error::{Error, Result};
use ft991util_core::transport::Transport;
use ft991util_transport::SerialTransport;

use crate::rig::Ft991;

/// Default baud rate, matching the rig's factory CAT RATE setting.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default time to wait for one command's reply.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Fluent builder for [`Ft991`].
pub struct Ft991Builder {
    serial_port: Option<String>,
    baud_rate: u32,
    command_timeout: Duration,
}

impl Ft991Builder {
    /// Create a builder with default baud rate and timeout.
    pub fn new() -> Self {
        Ft991Builder {
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM5`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the baud rate (must match the rig's CAT RATE menu).
    pub fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Set the timeout for one command's reply.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Open the serial port and build the handle.
    ///
    /// Requires [`serial_port()`](Self::serial_port) to have been called.
    pub async fn build(self) -> Result<Ft991> {
        let port = self
            .serial_port
            .as_deref()
            .ok_or_else(|| Error::Connection("no serial port configured".into()))?;
        let transport = SerialTransport::open(port, self.baud_rate).await?;
        Ok(Ft991::new(Box::new(transport), self.command_timeout))
    }

    /// Build the handle over an existing transport (used by tests with
    /// the mock transport).
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Ft991 {
        Ft991::new(transport, self.command_timeout)
    }
}

impl Default for Ft991Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let builder = Ft991Builder::new();
        assert_eq!(builder.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(builder.command_timeout, DEFAULT_COMMAND_TIMEOUT);
        assert!(builder.serial_port.is_none());
    }

    #[tokio::test]
    async fn build_without_port_fails() {
        let result = Ft991Builder::new().build().await;
        assert!(matches!(result.unwrap_err(), Error::Connection(_)));
    }
}
