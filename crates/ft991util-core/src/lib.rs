//! ft991util-core: Core traits, types, and error definitions for ft991util.
//!
//! This crate defines the abstractions shared by every other crate in the
//! workspace: the byte-level [`Transport`] trait, the error taxonomy, and
//! the FT-991 value types (operating mode, repeater shift, tone squelch)
//! that both the CAT codec and the backup-file codec speak.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Error`] / [`Result`] -- error handling
//! - [`Mode`], [`RepeaterShift`], [`ToneSquelch`] -- channel value objects

pub mod coverage;
pub mod error;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use ft991util_core::*`.
pub use coverage::{CoverageSegment, RECEIVER_COVERAGE, in_coverage};
pub use error::{Error, FieldViolation, Result};
pub use transport::Transport;
pub use types::*;
