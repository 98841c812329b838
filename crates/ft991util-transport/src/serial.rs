//! Serial port transport for the FT-991.
//!
//! The FT-991 presents a USB virtual COM port (two, actually; CAT is the
//! "Enhanced" port). Framing is fixed at 8 data bits, 1 stop bit, no
//! parity, no flow control; only the baud rate varies (4800-38400,
//! matching the rig's menu setting).
//!
//! # Example
//!
//! ```no_run
//! use ft991util_transport::SerialTransport;
//! use ft991util_core::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> ft991util_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//! transport.send(b"IF;").await?;
//!
//! let mut buf = [0u8; 256];
//! let n = transport.receive(&mut buf, Duration::from_millis(500)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};

use ft991util_core::error::{Error, Result};
use ft991util_core::transport::Transport;

/// Serial port transport for CAT communication.
///
/// The port handle is owned exclusively by this struct and released on
/// every exit path: [`close()`](Transport::close) drops it explicitly,
/// and `Drop` covers early returns and panics.
pub struct SerialTransport {
    /// The underlying serial port stream; `None` once closed.
    port: Option<SerialStream>,
    /// Port path for logging.
    port_name: String,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate (8N1, no flow control).
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g. `/dev/ttyUSB0` on Linux, `COM5`
    ///   on Windows)
    /// * `baud_rate` - Baud rate matching the rig's CAT RATE menu setting
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        tracing::debug!(port = %port, baud_rate, "Opening serial port");

        let mut stream = tokio_serial::new(port, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "Failed to open serial port");
                Error::Connection(format!("failed to open serial port {port}: {e}"))
            })?;

        // De-assert DTR and RTS immediately after opening. The OS asserts
        // DTR on open by default, and the rig routes those lines to PTT
        // and CW key inputs.
        if let Err(e) = stream.write_data_terminal_ready(false) {
            tracing::warn!(port = %port, error = %e, "Failed to de-assert DTR");
        }
        if let Err(e) = stream.write_request_to_send(false) {
            tracing::warn!(port = %port, error = %e, "Failed to de-assert RTS");
        }

        tracing::info!(port = %port, baud_rate, "Serial port opened");

        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
        })
    }

    /// The path of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(port = %self.port_name, bytes = data.len(), data = ?data, "Sending");

        port.write_all(data).await.map_err(map_io_error)?;
        // Flush so the whole frame goes out before we start the reply timer.
        port.flush().await.map_err(map_io_error)?;
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, data = ?&buf[..n], "Received");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "Receive failed");
                Err(map_io_error(e))
            }
            Err(_) => {
                tracing::trace!(port = %self.port_name, timeout_ms = timeout.as_millis(), "Receive timeout");
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            tracing::debug!(port = %self.port_name, "Closing serial port");
            if let Err(e) = port.flush().await {
                tracing::warn!(port = %self.port_name, error = %e, "Flush before close failed");
            }
            // Dropping the stream releases the handle.
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

fn map_io_error(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::BrokenPipe || e.kind() == std::io::ErrorKind::NotConnected {
        Error::ConnectionLost
    } else {
        Error::Io(e)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.port.is_some() {
            tracing::debug!(port = %self.port_name, "SerialTransport dropped, closing port");
        }
    }
}
