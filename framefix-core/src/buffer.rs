/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Stream buffer cursor for incremental framing.
//!
//! [`StreamBuffer`] is the bounded, growable byte region the framer reads
//! from. It is owned by the transport layer for the lifetime of a
//! connection: the transport appends delivered bytes, the framer advances
//! the read position past consumed messages, and the transport compacts the
//! consumed prefix between invocations. The framer itself never holds onto
//! the buffer beyond a single call.
//!
//! Invariant: `position <= limit <= capacity`. The methods that could break
//! it return [`FramerError::Contract`] instead, signaling a transport-layer
//! bug rather than a stream-data problem.

use crate::error::{FramerError, Result};
use bytes::{Buf, BytesMut};

/// Growable byte region with a read position and mark/reset semantics.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    /// Buffered bytes; the limit is the buffered length.
    data: BytesMut,
    /// Read position; everything before it has been consumed.
    position: usize,
    /// Saved position for `reset`, if any.
    mark: Option<usize>,
}

impl StreamBuffer {
    /// Creates an empty stream buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream buffer with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            position: 0,
            mark: None,
        }
    }

    /// Appends delivered bytes at the limit.
    ///
    /// # Arguments
    /// * `bytes` - The newly delivered bytes
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Returns the current read position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the limit (number of buffered bytes).
    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.data.len()
    }

    /// Returns the allocated capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the number of unconsumed bytes.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit() - self.position
    }

    /// Returns true if no unconsumed bytes remain.
    #[inline]
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the read position to an absolute offset.
    ///
    /// # Arguments
    /// * `position` - Absolute offset, at most the limit
    ///
    /// # Errors
    /// Returns [`FramerError::Contract`] if `position` is beyond the limit.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit() {
            return Err(FramerError::Contract(format!(
                "position {position} beyond limit {}",
                self.limit()
            )));
        }
        self.position = position;
        Ok(())
    }

    /// Advances the read position by `count` bytes.
    ///
    /// # Errors
    /// Returns [`FramerError::Contract`] if fewer than `count` bytes remain.
    pub fn advance(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(FramerError::Contract(format!(
                "advance of {count} bytes with {} remaining",
                self.remaining()
            )));
        }
        self.position += count;
        Ok(())
    }

    /// Saves the current read position for a later [`reset`](Self::reset).
    pub fn mark(&mut self) {
        self.mark = Some(self.position);
    }

    /// Restores the read position saved by [`mark`](Self::mark).
    ///
    /// # Errors
    /// Returns [`FramerError::Contract`] if no mark is set.
    pub fn reset(&mut self) -> Result<()> {
        match self.mark {
            Some(position) => {
                self.position = position;
                Ok(())
            }
            None => Err(FramerError::Contract("reset without mark".to_string())),
        }
    }

    /// Returns all buffered bytes up to the limit.
    ///
    /// Offsets reported by the framer are absolute indices into this slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the unconsumed bytes, from the read position to the limit.
    #[inline]
    #[must_use]
    pub fn window(&self) -> &[u8] {
        &self.data[self.position..]
    }

    /// Drops the consumed prefix and rebases the read position to zero.
    ///
    /// Compaction is the owner's responsibility, invoked between framer
    /// invocations once bytes have actually been consumed. Any mark is
    /// invalidated.
    pub fn compact(&mut self) {
        self.data.advance(self.position);
        self.position = 0;
        self.mark = None;
    }
}

impl From<&[u8]> for StreamBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
            position: 0,
            mark: None,
        }
    }
}
