/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message vocabulary for the framing layer.
//!
//! This module provides:
//! - [`MsgType`]: the session-level administrative message types the framer
//!   needs to recognize, plus a catch-all for application types
//! - [`FrameSpan`]: the (start, end) byte range of one framed message

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// FIX message types relevant to framing.
///
/// The framer only needs the session-level administrative set: critical
/// escalation keys off [`Logon`](Self::Logon), and sinks routing on message
/// type mostly care about admin traffic. Application message types are
/// carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MsgType {
    /// Heartbeat (0).
    #[default]
    Heartbeat,
    /// Test Request (1).
    TestRequest,
    /// Resend Request (2).
    ResendRequest,
    /// Reject (3).
    Reject,
    /// Sequence Reset (4).
    SequenceReset,
    /// Logout (5).
    Logout,
    /// Logon (A) - session initiation.
    Logon,
    /// Application or unknown message type.
    Custom(String),
}

impl std::str::FromStr for MsgType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" => Self::Heartbeat,
            "1" => Self::TestRequest,
            "2" => Self::ResendRequest,
            "3" => Self::Reject,
            "4" => Self::SequenceReset,
            "5" => Self::Logout,
            "A" => Self::Logon,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl MsgType {
    /// Returns the string representation of this message type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heartbeat => "0",
            Self::TestRequest => "1",
            Self::ResendRequest => "2",
            Self::Reject => "3",
            Self::SequenceReset => "4",
            Self::Logout => "5",
            Self::Logon => "A",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Returns true if this is an administrative message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Returns true if losing this message silently would desynchronize the
    /// session, so framing failures on it must not be skipped.
    #[must_use]
    pub fn is_session_critical(&self) -> bool {
        matches!(self, Self::Logon)
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Byte range of one complete framed message within a stream buffer.
///
/// Offsets are absolute indices into the buffer the message was framed
/// from: `start` is the first byte of the BeginString tag, `end` is one past
/// the SOH terminating the checksum field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSpan {
    /// Offset of the first byte of the message.
    pub start: usize,
    /// Offset one past the last byte of the message.
    pub end: usize,
}

impl FrameSpan {
    /// Creates a new frame span.
    ///
    /// # Arguments
    /// * `start` - Offset of the first message byte
    /// * `end` - Offset one past the last message byte
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the message length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span as an index range.
    #[inline]
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<FrameSpan> for Range<usize> {
    fn from(span: FrameSpan) -> Self {
        span.as_range()
    }
}

impl fmt::Display for FrameSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}
