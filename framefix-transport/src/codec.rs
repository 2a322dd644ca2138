/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Tokio codec driving the FrameFix framer.
//!
//! This module adapts the framer to `tokio-util`'s codec interface. The
//! codec owns the per-connection [`StreamBuffer`] (the carry-over buffer the
//! framer itself never holds): delivered bytes are appended to it, every
//! complete message is extracted in one pass, and the consumed prefix is
//! compacted before the next delivery.

use bytes::{BufMut, Bytes, BytesMut};
use framefix_core::buffer::StreamBuffer;
use framefix_core::error::FramerError;
use framefix_core::message::FrameSpan;
use framefix_framer::{ExtractOutcome, Framer, FramerConfig};
use smallvec::SmallVec;
use std::collections::VecDeque;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Errors that can occur during codec operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Framing failed in a way the framer does not recover from.
    #[error("framing error: {0}")]
    Framing(#[from] FramerError),

    /// I/O error from the underlying transport.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Tokio codec for FIX message framing.
///
/// Each decoded item is one complete message, trailer included, byte-exact
/// as it appeared on the wire. Garbage and corrupt candidates are skipped by
/// the framer; only critical framing failures surface as errors.
#[derive(Debug, Default)]
pub struct FramerCodec {
    /// The stateless framer.
    framer: Framer,
    /// Connection-owned residual buffer carried across deliveries.
    buffer: StreamBuffer,
    /// Frames extracted but not yet handed out by `decode`.
    ready: VecDeque<Bytes>,
}

impl FramerCodec {
    /// Creates a codec with default framer settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with the given framer configuration.
    #[must_use]
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            framer: Framer::with_config(config),
            buffer: StreamBuffer::new(),
            ready: VecDeque::new(),
        }
    }

    /// Returns the number of residual bytes awaiting more data.
    #[must_use]
    pub fn residual(&self) -> usize {
        self.buffer.remaining()
    }
}

impl Decoder for FramerCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            self.buffer.append(&src.split());
        }
        if let Some(frame) = self.ready.pop_front() {
            return Ok(Some(frame));
        }

        let mut frames: SmallVec<[Bytes; 4]> = SmallVec::new();
        let mut sink = |message: &[u8], _span: FrameSpan| {
            frames.push(Bytes::copy_from_slice(message));
        };
        let outcome = self.framer.extract(&mut self.buffer, &mut sink)?;
        // the consumed prefix is ours to reclaim between deliveries
        self.buffer.compact();

        if let ExtractOutcome::Drained { emitted } = outcome {
            trace!(emitted, residual = self.buffer.remaining(), "drained frames");
        }
        self.ready.extend(frames);
        Ok(self.ready.pop_front())
    }
}

impl Encoder<&[u8]> for FramerCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put_slice(item);
        Ok(())
    }
}

impl Encoder<Bytes> for FramerCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put_slice(&item);
        Ok(())
    }
}
