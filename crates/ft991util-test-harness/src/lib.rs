//! ft991util-test-harness: deterministic test doubles for the CAT engine.
//!
//! Provides [`MockTransport`], a scripted [`Transport`](ft991util_core::Transport)
//! that lets protocol and orchestrator tests run without a radio.

pub mod mock_serial;

pub use mock_serial::MockTransport;
