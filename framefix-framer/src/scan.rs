/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Header scanner.
//!
//! Determines, read-only, whether a complete message header (BeginString
//! and BodyLength, each SOH-terminated) is present at a candidate offset.
//! Nothing here moves the buffer position: a [`HeaderScan::Incomplete`]
//! result leaves the stream exactly as received, ready to be retried
//! verbatim once more bytes arrive.

use framefix_core::error::FramingFault;
use framefix_core::message::MsgType;
use memchr::{memchr, memmem};

/// SOH (Start of Header) field delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Longest BodyLength digit run accepted before the declared value is
/// treated as garbage rather than a length.
const MAX_BODY_LENGTH_DIGITS: usize = 9;

/// Result of scanning for a complete header at a candidate offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderScan {
    /// The buffer ends before both leading fields are fully terminated.
    Incomplete,
    /// The candidate is not a well-formed message start.
    Mismatch(FramingFault),
    /// Both leading fields are present and well-formed.
    Complete {
        /// Parsed BodyLength value.
        body_length: usize,
        /// Absolute offset immediately past the BodyLength terminator.
        header_end: usize,
    },
}

/// Scans for a complete message header at `start`.
///
/// Expects the literal `8=` tag, a SOH-terminated BeginString value, the
/// literal `9=` tag, and a SOH-terminated run of ASCII digits, in that
/// fixed order.
///
/// # Arguments
/// * `buf` - All buffered bytes up to the limit
/// * `start` - Absolute candidate offset
#[must_use]
pub fn scan_header(buf: &[u8], start: usize) -> HeaderScan {
    let bytes = &buf[start..];

    match leading_literal(bytes, 0, b"8=") {
        Literal::Incomplete => return HeaderScan::Incomplete,
        Literal::Absent => return HeaderScan::Mismatch(FramingFault::MissingBeginString),
        Literal::Present => {}
    }
    let Some(soh) = memchr(SOH, &bytes[2..]) else {
        return HeaderScan::Incomplete;
    };

    let length_tag = 2 + soh + 1;
    match leading_literal(bytes, length_tag, b"9=") {
        Literal::Incomplete => return HeaderScan::Incomplete,
        Literal::Absent => return HeaderScan::Mismatch(FramingFault::MissingBodyLength),
        Literal::Present => {}
    }

    let digits_start = length_tag + 2;
    let mut body_length = 0usize;
    let mut digits = 0usize;
    for (i, &b) in bytes[digits_start..].iter().enumerate() {
        match b {
            SOH if digits == 0 => {
                return HeaderScan::Mismatch(FramingFault::InvalidBodyLength);
            }
            SOH => {
                return HeaderScan::Complete {
                    body_length,
                    header_end: start + digits_start + i + 1,
                };
            }
            b'0'..=b'9' if digits < MAX_BODY_LENGTH_DIGITS => {
                body_length = body_length * 10 + usize::from(b - b'0');
                digits += 1;
            }
            _ => return HeaderScan::Mismatch(FramingFault::InvalidBodyLength),
        }
    }
    HeaderScan::Incomplete
}

/// Best-effort read of the MsgType field (tag 35) from a framed message.
///
/// Useful for sinks that route on message type without a full tag-value
/// parse. Returns `None` if the field is absent or unterminated.
#[must_use]
pub fn peek_msg_type(message: &[u8]) -> Option<MsgType> {
    let tag = memmem::find(message, b"\x0135=")?;
    let value_start = tag + 4;
    let value_len = memchr(SOH, message.get(value_start..)?)?;
    let value = std::str::from_utf8(&message[value_start..value_start + value_len]).ok()?;
    value.parse().ok()
}

/// Presence of an expected literal at an offset within buffered bytes.
enum Literal {
    Present,
    Absent,
    Incomplete,
}

fn leading_literal(bytes: &[u8], at: usize, literal: &[u8]) -> Literal {
    for (i, &expected) in literal.iter().enumerate() {
        match bytes.get(at + i) {
            None => return Literal::Incomplete,
            Some(&b) if b != expected => return Literal::Absent,
            Some(_) => {}
        }
    }
    Literal::Present
}
