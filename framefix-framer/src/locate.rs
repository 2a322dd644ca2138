/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Length-framed body locator.
//!
//! Given a scanned header, computes where the message must end and verifies
//! the trailer is structurally where the declared length says it is. The
//! declared length is never trusted blindly: a corrupted BodyLength would
//! otherwise silently swallow or split the following message, so the
//! checksum tag must sit exactly at the computed offset before the span is
//! accepted.

use framefix_core::error::FramingFault;
use framefix_core::message::FrameSpan;

use crate::checksum::{checksum_of, parse_declared};
use crate::config::FramerConfig;

/// Fixed width of the checksum field: `10=XXX<SOH>`.
pub const TRAILER_LEN: usize = 7;

/// Literal tag opening the checksum field.
const TRAILER_TAG: &[u8] = b"10=";

/// Result of locating a message body from a scanned header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLocation {
    /// The buffer ends before the computed message end.
    Incomplete,
    /// The declared length does not frame a structurally valid message.
    Mismatch(FramingFault),
    /// One complete message occupies the span.
    Located {
        /// Absolute span of the complete message, trailer included.
        span: FrameSpan,
    },
}

/// Locates the end of the message whose header was scanned at `start`.
///
/// The message must end `body_length` bytes past the header, followed by
/// the fixed-width checksum field; the BodyLength boundary is defined to
/// land exactly at the literal `10=` tag.
///
/// # Arguments
/// * `buf` - All buffered bytes up to the limit
/// * `start` - Absolute offset of the message start
/// * `header_end` - Absolute offset just past the BodyLength terminator
/// * `body_length` - Parsed BodyLength value
/// * `config` - Size cap and checksum-validation settings
#[must_use]
pub fn locate_body(
    buf: &[u8],
    start: usize,
    header_end: usize,
    body_length: usize,
    config: &FramerConfig,
) -> BodyLocation {
    let span_len = (header_end - start) + body_length + TRAILER_LEN;
    if span_len > config.max_message_size {
        return BodyLocation::Mismatch(FramingFault::MessageTooLarge {
            span: span_len,
            max_size: config.max_message_size,
        });
    }

    let trailer_start = header_end + body_length;
    let end = trailer_start + TRAILER_LEN;
    if buf.len() < end {
        return BodyLocation::Incomplete;
    }

    if &buf[trailer_start..trailer_start + TRAILER_TAG.len()] != TRAILER_TAG {
        return BodyLocation::Mismatch(FramingFault::TrailerTagMissing {
            offset: trailer_start,
        });
    }

    if config.validate_checksum {
        let digits = &buf[trailer_start + TRAILER_TAG.len()..end - 1];
        let Some(declared) = parse_declared(digits) else {
            return BodyLocation::Mismatch(FramingFault::TrailerTagMissing {
                offset: trailer_start,
            });
        };
        let calculated = checksum_of(&buf[start..trailer_start]);
        if calculated != declared {
            return BodyLocation::Mismatch(FramingFault::ChecksumMismatch {
                calculated,
                declared,
            });
        }
    }

    BodyLocation::Located {
        span: FrameSpan::new(start, end),
    }
}
