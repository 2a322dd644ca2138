/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the FrameFix framing engine.
//!
//! This module provides the framing error hierarchy using `thiserror`.
//!
//! "Need more data" is deliberately absent here: partial delivery is the
//! steady state of a network stream, so it is modeled as an outcome variant
//! on the framer operations, never as an error.

use thiserror::Error;

/// Result type alias using [`FramerError`] as the error type.
pub type Result<T> = std::result::Result<T, FramerError>;

/// Classification of a framing mismatch at a candidate message start.
///
/// Mismatches are recovered locally by resynchronization and are not surfaced
/// to callers on their own; they appear only inside
/// [`FramerError::CriticalFraming`] and in diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramingFault {
    /// The candidate offset does not carry the BeginString tag (8=).
    #[error("candidate does not start with the begin string tag (8=)")]
    MissingBeginString,

    /// The second field of the candidate is not the BodyLength tag (9=).
    #[error("missing body length field (tag 9)")]
    MissingBodyLength,

    /// The BodyLength value is empty, non-numeric, or absurdly long.
    #[error("invalid body length value")]
    InvalidBodyLength,

    /// The declared length frames a span above the configured maximum.
    #[error("declared span too large: {span} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Total span the declared length would frame, in bytes.
        span: usize,
        /// Maximum allowed message size in bytes.
        max_size: usize,
    },

    /// The checksum tag (10=) is absent at the offset the declared length
    /// points to.
    #[error("checksum tag not found at computed offset {offset}")]
    TrailerTagMissing {
        /// Absolute buffer offset where the checksum tag was expected.
        offset: usize,
    },

    /// The declared checksum value does not match the calculated one.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in the message trailer.
        declared: u8,
    },
}

/// Errors surfaced to the caller of the framer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramerError {
    /// A session-critical message (Logon) failed to frame.
    ///
    /// Skipping a critical message silently could desynchronize session
    /// state downstream, so the failure is escalated instead of being
    /// resynchronized past. The caller decides connection-level
    /// consequences.
    #[error("critical message failed framing at offset {offset}: {fault}")]
    CriticalFraming {
        /// The underlying framing mismatch.
        fault: FramingFault,
        /// Absolute buffer offset of the failed candidate start.
        offset: usize,
    },

    /// The calling transport layer misused the framer contract.
    ///
    /// This is a bug class distinct from stream-data problems: a cursor
    /// moved beyond its limit, a reset without a mark. Stream corruption
    /// never produces this variant.
    #[error("framer contract violation: {0}")]
    Contract(String),
}
