//! FT-991 CAT frame-level encoder/decoder.
//!
//! CAT commands are ASCII frames terminated with `;` (0x3B): a two-letter
//! uppercase command tag followed by zero or more parameter characters.
//! Replies echo the tag, followed by data, terminated with `;`. The reply
//! for an unrecognised or refused command is `?;`.
//!
//! ```text
//! MT003146520000+000000400200400   CALL     ;   (set memory channel 3)
//! EX031;                                        (read menu item 31)
//! ```
//!
//! This module handles only the framing; the per-command field layouts
//! live in [`commands`](crate::commands).

use bytes::{BufMut, BytesMut};

/// CAT command/reply terminator byte.
pub const TERMINATOR: u8 = b';';

/// Reject reply from the rig: `?;`.
pub const REJECT_RESPONSE: &[u8] = b"?;";

/// Result of attempting to decode one CAT reply from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// A complete reply was decoded.
    Response {
        /// Command tag echoed in the reply (e.g. `"MT"`, `"EX"`).
        prefix: String,
        /// Everything between the tag and the terminator.
        data: String,
        /// Number of bytes consumed from the input buffer,
        /// including the terminator.
        consumed: usize,
    },

    /// The rig rejected the command with `?;`.
    ///
    /// The `usize` is the number of bytes consumed from the input buffer.
    Reject(usize),

    /// The buffer does not yet contain a complete reply.
    Incomplete,
}

/// Encode a CAT command into raw bytes ready for transmission.
///
/// Concatenates the command tag, the payload, and the terminator.
///
/// # Example
///
/// ```
/// use ft991util_cat::protocol::encode_command;
///
/// assert_eq!(encode_command("RT", ""), b"RT;");
/// assert_eq!(encode_command("MC", "003"), b"MC003;");
/// ```
pub fn encode_command(tag: &str, payload: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(tag.len() + payload.len() + 1);
    buf.put_slice(tag.as_bytes());
    buf.put_slice(payload.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.to_vec()
}

/// Attempt to decode one CAT reply from a byte buffer.
///
/// Scans `buf` for the terminator. Returns [`DecodeResult::Response`]
/// with the number of bytes consumed, [`DecodeResult::Reject`] for `?;`,
/// or [`DecodeResult::Incomplete`] if no complete reply is available yet.
///
/// The prefix is the run of leading uppercase ASCII letters; every
/// command this utility uses (`MT`, `MC`, `CN`, `RT`, `XT`, `EX`) has a
/// purely alphabetic two-letter tag, so no further splitting is needed.
/// A reply that is not valid UTF-8 is classified as a reject so the
/// caller treats it as undecodable rather than panicking mid-parse.
pub fn decode_response(buf: &[u8]) -> DecodeResult {
    if buf.is_empty() {
        return DecodeResult::Incomplete;
    }

    let term_pos = match buf.iter().position(|&b| b == TERMINATOR) {
        Some(pos) => pos,
        None => return DecodeResult::Incomplete,
    };

    let consumed = term_pos + 1;
    let body = &buf[..term_pos];

    if body == b"?" {
        return DecodeResult::Reject(consumed);
    }

    let body_str = match std::str::from_utf8(body) {
        Ok(s) => s,
        Err(_) => return DecodeResult::Reject(consumed),
    };

    let prefix_end = body_str
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(body_str.len());

    DecodeResult::Response {
        prefix: body_str[..prefix_end].to_string(),
        data: body_str[prefix_end..].to_string(),
        consumed,
    }
}
