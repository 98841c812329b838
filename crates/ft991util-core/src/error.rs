//! Error types for ft991util.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, protocol-layer, and
//! validation errors are all captured here.

use std::fmt;

/// A record field that failed domain validation.
///
/// Carries enough context to point the operator at the exact problem:
/// which record (a channel number, a menu item, or a file line), which
/// field, and which constraint was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Identifies the record, e.g. `"channel 42"` or `"line 7"`.
    pub record: String,
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the violated constraint.
    pub reason: String,
}

impl FieldViolation {
    /// Create a violation for the named record and field.
    pub fn new(record: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        FieldViolation {
            record: record.into(),
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.record, self.field, self.reason)
    }
}

/// The error type for all ft991util operations.
///
/// Variants cover the full range of failure modes encountered when
/// talking to the rig and when handling backup files: connection
/// failures, timeouts, undecodable CAT replies, the rig's `?;` reject
/// answer, and record validation failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serial connection could not be opened.
    #[error("connection error: {0}")]
    Connection(String),

    /// The connection to the rig was lost mid-operation.
    #[error("connection lost")]
    ConnectionLost,

    /// No connection to the rig has been established.
    #[error("not connected")]
    NotConnected,

    /// Timed out waiting for the `;` terminator.
    ///
    /// This typically indicates the rig is powered off, the baud rate is
    /// wrong, or the cable is unplugged.
    #[error("timeout waiting for response")]
    Timeout,

    /// A received frame cannot be decoded per the expected layout
    /// for its command.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The rig rejected the command with its `?;` error response.
    ///
    /// Unlike [`Error::Protocol`], the device understood the framing and
    /// actively refused the command, so retrying cannot help.
    #[error("rig rejected command (?;)")]
    Rejected,

    /// A record field violates its domain.
    #[error("validation error: {0}")]
    Validation(FieldViolation),

    /// A backup file contained one or more invalid records.
    ///
    /// Every violation is listed so the operator can fix the whole file
    /// in one pass.
    #[error("backup file rejected:{}", format_violations(.0))]
    InvalidBackup(Vec<FieldViolation>),

    /// A bulk operation failed at a specific record.
    ///
    /// Wraps the underlying failure with the record identifier so the
    /// operator knows exactly where a backup stopped.
    #[error("{record}: {cause}")]
    Record {
        /// The record that failed, e.g. `"channel 42"` or `"menu item 9"`.
        record: String,
        /// The underlying failure.
        cause: Box<Error>,
    },

    /// A bulk device write stopped partway through.
    ///
    /// The device has no transaction primitive: records before `record`
    /// were applied, `record` and everything after it still hold the
    /// device's prior contents.
    #[error(
        "{record} failed after {applied} of {total} records restored \
         ({cause}); remaining records left at prior device state"
    )]
    PartialRestore {
        /// Number of records successfully applied before the failure.
        applied: usize,
        /// Total number of records in the restore set.
        total: usize,
        /// The record that failed, e.g. `"channel 42"`.
        record: String,
        /// The underlying failure.
        cause: Box<Error>,
    },

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error may clear up on a retry of the same command.
    ///
    /// Only timeouts and undecodable replies qualify; a `?;` reject, a
    /// validation failure, or a dead connection will not improve by
    /// re-sending.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Timeout | Error::Protocol(_))
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    let mut out = String::new();
    for v in violations {
        out.push_str("\n  ");
        out.push_str(&v.to_string());
    }
    out
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
