//! ft991util-transport: serial port transport for the FT-991.
//!
//! Provides [`SerialTransport`], the [`Transport`](ft991util_core::Transport)
//! implementation used against real hardware. Protocol tests use the mock
//! transport from `ft991util-test-harness` instead.

pub mod serial;

pub use serial::SerialTransport;
