/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Decoder state machine.
//!
//! [`Framer`] orchestrates the header scanner, body locator, and
//! resynchronizer across repeated invocations on the same connection. It is
//! a pure function of (configuration, buffer state): all cross-invocation
//! state lives in the transport-owned [`StreamBuffer`], so one framer value
//! can be shared per connection without locking as long as each instance is
//! driven from a single thread at a time.
//!
//! The two operations split cheap inspection from committed consumption:
//! [`Framer::probe`] answers "is at least one complete message buffered"
//! without touching the buffer, and [`Framer::extract`] emits every
//! complete message currently buffered, advancing the read position past
//! each one.

use framefix_core::buffer::StreamBuffer;
use framefix_core::error::{FramerError, FramingFault, Result};
use framefix_core::message::FrameSpan;
use tracing::{debug, warn};

use crate::config::FramerConfig;
use crate::locate::{self, BodyLocation};
use crate::resync;
use crate::scan::{self, HeaderScan};

/// Receiver for framed messages, invoked in strict arrival order.
pub trait MessageSink {
    /// Accepts one complete framed message.
    ///
    /// # Arguments
    /// * `message` - The message bytes, trailer included; valid only for
    ///   the duration of the call
    /// * `span` - Absolute span of the message in the stream buffer
    fn on_message(&mut self, message: &[u8], span: FrameSpan);
}

impl<F: FnMut(&[u8], FrameSpan)> MessageSink for F {
    fn on_message(&mut self, message: &[u8], span: FrameSpan) {
        self(message, span);
    }
}

/// Outcome of a read-only probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No complete message is buffered yet; re-probe once more bytes arrive.
    NeedMoreData,
    /// At least one complete message can be extracted.
    Ready,
}

/// Outcome of an extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Nothing was emitted; the buffered bytes hold no complete message.
    NeedMoreData,
    /// Every complete message currently buffered has been emitted.
    Drained {
        /// Number of messages handed to the sink this invocation.
        emitted: usize,
    },
}

/// Streaming FIX message framer.
#[derive(Debug, Clone, Default)]
pub struct Framer {
    /// Framing configuration.
    config: FramerConfig,
}

impl Framer {
    /// Creates a framer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a framer with the given configuration.
    #[must_use]
    pub fn with_config(config: FramerConfig) -> Self {
        Self { config }
    }

    /// Returns the framer configuration.
    #[must_use]
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Checks whether at least one complete message is available from the
    /// buffer's current read position.
    ///
    /// Read-only: the buffer is left exactly as received, so probing any
    /// number of times without new bytes returns the same outcome.
    ///
    /// # Errors
    /// Returns [`FramerError::CriticalFraming`] if a session-critical
    /// message fails to frame.
    pub fn probe(&self, buffer: &StreamBuffer) -> Result<ProbeOutcome> {
        match self.next_frame(buffer.as_bytes(), buffer.position())? {
            Some(_) => Ok(ProbeOutcome::Ready),
            None => Ok(ProbeOutcome::NeedMoreData),
        }
    }

    /// Frames and emits every complete message currently buffered.
    ///
    /// Messages are handed to the sink in strict arrival order, each before
    /// the next is attempted, and the read position advances past each
    /// consumed message. Once the remaining bytes hold no further complete
    /// message the pass ends: [`ExtractOutcome::Drained`] if anything was
    /// emitted, [`ExtractOutcome::NeedMoreData`] otherwise.
    ///
    /// # Errors
    /// Returns [`FramerError::CriticalFraming`] if a session-critical
    /// message fails to frame. Messages already emitted this invocation
    /// stay emitted, and the unconsumed bytes are left in place for
    /// inspection.
    pub fn extract<S>(&self, buffer: &mut StreamBuffer, sink: &mut S) -> Result<ExtractOutcome>
    where
        S: MessageSink + ?Sized,
    {
        let mut emitted = 0usize;
        while let Some(span) = self.next_frame(buffer.as_bytes(), buffer.position())? {
            sink.on_message(&buffer.as_bytes()[span.as_range()], span);
            buffer.set_position(span.end)?;
            emitted += 1;
            debug!(%span, "framed message");
        }
        if emitted > 0 {
            Ok(ExtractOutcome::Drained { emitted })
        } else {
            Ok(ExtractOutcome::NeedMoreData)
        }
    }

    /// Frames the next complete message at or after `from`, resynchronizing
    /// past mismatched candidates.
    ///
    /// Returns `None` when the buffered bytes hold no complete message from
    /// `from` onward.
    fn next_frame(&self, buf: &[u8], from: usize) -> Result<Option<FrameSpan>> {
        let prefix = self.config.begin_string_prefix.as_bytes();
        let mut cursor = from;
        while let Some(start) = resync::next_candidate(buf, cursor, prefix) {
            let (fault, claimed_end) = match scan::scan_header(buf, start) {
                HeaderScan::Incomplete => return Ok(None),
                HeaderScan::Mismatch(fault) => (fault, buf.len()),
                HeaderScan::Complete {
                    body_length,
                    header_end,
                } => match locate::locate_body(buf, start, header_end, body_length, &self.config) {
                    BodyLocation::Incomplete => return Ok(None),
                    BodyLocation::Located { span } => return Ok(Some(span)),
                    BodyLocation::Mismatch(fault) => {
                        let claimed = header_end + body_length + locate::TRAILER_LEN;
                        (fault, claimed.min(buf.len()))
                    }
                },
            };
            match self.fail_candidate(buf, start, claimed_end, fault)? {
                Some(next) => cursor = next,
                None => return Ok(None),
            }
        }
        Ok(None)
    }

    /// Handles a framing mismatch at `start`: escalates if the suspect
    /// bytes carry a session-critical message, otherwise resynchronizes.
    ///
    /// The suspect region runs from the failed candidate to the first of
    /// its claimed end, the next plausible start, or the limit - the bytes
    /// that skipping this candidate would actually give up on.
    fn fail_candidate(
        &self,
        buf: &[u8],
        start: usize,
        claimed_end: usize,
        fault: FramingFault,
    ) -> Result<Option<usize>> {
        let prefix = self.config.begin_string_prefix.as_bytes();
        let next = resync::next_candidate(buf, start + 1, prefix);
        let suspect_end = claimed_end.min(next.unwrap_or(buf.len()));
        if resync::contains_session_initiation(&buf[start..suspect_end]) {
            return Err(FramerError::CriticalFraming {
                fault,
                offset: start,
            });
        }
        warn!(offset = start, %fault, "framing mismatch, resynchronizing");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &[u8] = b"8=FIX.4.2\x019=12\x0135=X\x01108=30\x0110=036\x01";
    const GOOD2: &[u8] = b"8=FIX.4.2\x019=12\x0135=Y\x01108=30\x0110=037\x01";
    const BAD_LONG: &[u8] = b"8=FIX.4.2\x019=25\x0135=X\x01108=30\x0110=036\x01";
    const BAD_SHORT: &[u8] = b"8=FIX.4.2\x019=10\x0135=X\x01108=30\x0110=036\x01";
    const BAD_LOGON: &[u8] = b"8=FIX.4.2\x019=10\x0135=A\x01108=30\x0110=036\x01";
    const GOOD_LOGON: &[u8] = b"8=FIX.4.2\x019=12\x0135=A\x01108=30\x0110=061\x01";
    const BOGUS_LENGTH: &[u8] = b"8=FIX.4.2\x019=12xyz\x0135=X\x01108=30\x0110=036\x01";

    /// Sink collecting emitted frames for assertions.
    #[derive(Default)]
    struct Collector {
        frames: Vec<(Vec<u8>, FrameSpan)>,
    }

    impl MessageSink for Collector {
        fn on_message(&mut self, message: &[u8], span: FrameSpan) {
            self.frames.push((message.to_vec(), span));
        }
    }

    fn buffer_of(chunks: &[&[u8]]) -> StreamBuffer {
        let mut buffer = StreamBuffer::new();
        for chunk in chunks {
            buffer.append(chunk);
        }
        buffer
    }

    fn extract_all(buffer: &mut StreamBuffer) -> (Result<ExtractOutcome>, Vec<Vec<u8>>) {
        let framer = Framer::new();
        let mut sink = Collector::default();
        let outcome = framer.extract(buffer, &mut sink);
        (outcome, sink.frames.into_iter().map(|(m, _)| m).collect())
    }

    #[test]
    fn test_partial_header() {
        let framer = Framer::new();
        let buffer = StreamBuffer::from(&b"8=FIX.4.2"[..]);
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::NeedMoreData);
        // probing again without new bytes changes nothing
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::NeedMoreData);
    }

    #[test]
    fn test_simple_message() {
        let framer = Framer::new();
        let mut buffer = StreamBuffer::from(GOOD);
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::Ready);

        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
        assert!(buffer.is_drained());
    }

    #[test]
    fn test_probe_is_need_more_data_for_every_proper_prefix() {
        let framer = Framer::new();
        for cut in 0..GOOD.len() {
            let buffer = StreamBuffer::from(&GOOD[..cut]);
            assert_eq!(
                framer.probe(&buffer).unwrap(),
                ProbeOutcome::NeedMoreData,
                "cut={cut}"
            );
        }
    }

    #[test]
    fn test_split_message_at_every_offset() {
        let framer = Framer::new();
        for cut in 1..GOOD.len() {
            let mut buffer = StreamBuffer::from(&GOOD[..cut]);
            let mut sink = Collector::default();

            let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
            assert_eq!(outcome, ExtractOutcome::NeedMoreData, "cut={cut}");
            assert!(sink.frames.is_empty(), "cut={cut}");
            assert_eq!(buffer.position(), 0, "cut={cut}");

            // residual bytes stay in place; the rest of the message arrives
            buffer.append(&GOOD[cut..]);
            let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
            assert_eq!(outcome, ExtractOutcome::Drained { emitted: 1 }, "cut={cut}");
            assert_eq!(sink.frames[0].0, GOOD, "cut={cut}");
            assert_eq!(sink.frames[0].1, FrameSpan::new(0, GOOD.len()), "cut={cut}");
        }
    }

    #[test]
    fn test_garbage_before_begin_string_lookalike() {
        // leading junk that itself starts with "8=" must not anchor framing
        let mut buffer = buffer_of(&[b"8=!@#$%", GOOD]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
    }

    #[test]
    fn test_arbitrary_garbage_prefix() {
        let mut buffer = buffer_of(&[b"\x00\xffnoise***", GOOD]);
        let framer = Framer::new();
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::Ready);

        let mut sink = Collector::default();
        framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].0, GOOD);
        assert_eq!(sink.frames[0].1.start, 10);
    }

    #[test]
    fn test_garbage_only_is_preserved() {
        let mut buffer = StreamBuffer::from(&b"no message here"[..]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::NeedMoreData);
        assert!(frames.is_empty());
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 15);
    }

    #[test]
    fn test_bad_length_too_long_recovers_follower() {
        // the declared length overruns into GOOD; the corrupt candidate is
        // dropped and GOOD is still framed
        let mut buffer = buffer_of(&[BAD_LONG, GOOD]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
    }

    #[test]
    fn test_bad_length_too_long_recovers_all_followers() {
        let mut buffer = buffer_of(&[BAD_LONG, GOOD, GOOD2]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 2 });
        assert_eq!(frames, vec![GOOD.to_vec(), GOOD2.to_vec()]);
    }

    #[test]
    fn test_bad_length_too_short_recovers_follower() {
        let mut buffer = buffer_of(&[BAD_SHORT, GOOD]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
    }

    #[test]
    fn test_bogus_length_digits_resynchronized() {
        let mut buffer = buffer_of(&[BOGUS_LENGTH, GOOD]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
    }

    #[test]
    fn test_multiple_messages_in_order() {
        let mut buffer = buffer_of(&[GOOD, GOOD, GOOD]);
        let framer = Framer::new();
        let mut sink = Collector::default();
        let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(outcome, ExtractOutcome::Drained { emitted: 3 });
        for (i, (message, span)) in sink.frames.iter().enumerate() {
            assert_eq!(message, GOOD);
            assert_eq!(*span, FrameSpan::new(i * GOOD.len(), (i + 1) * GOOD.len()));
        }
        assert!(buffer.is_drained());
    }

    #[test]
    fn test_partial_tail_keeps_emitted_messages() {
        let mut buffer = buffer_of(&[GOOD, &GOOD2[..20]]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD.to_vec()]);
        assert_eq!(buffer.position(), GOOD.len());

        buffer.append(&GOOD2[20..]);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD2.to_vec()]);
    }

    #[test]
    fn test_extract_from_position() {
        let mut buffer = buffer_of(&[GOOD, GOOD2]);
        buffer.set_position(GOOD.len()).unwrap();
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD2.to_vec()]);
    }

    #[test]
    fn test_bad_length_on_logon_is_critical() {
        let framer = Framer::new();
        let mut buffer = StreamBuffer::from(BAD_LOGON);
        let err = framer.probe(&buffer).unwrap_err();
        assert!(matches!(
            err,
            FramerError::CriticalFraming {
                fault: FramingFault::TrailerTagMissing { .. },
                offset: 0,
            }
        ));

        let mut sink = Collector::default();
        let err = framer.extract(&mut buffer, &mut sink).unwrap_err();
        assert!(matches!(err, FramerError::CriticalFraming { .. }));
        assert!(sink.frames.is_empty());
        // unconsumed bytes stay put for inspection
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn test_bogus_length_on_logon_is_critical() {
        let bogus_logon = b"8=FIX.4.2\x019=12xyz\x0135=A\x01108=30\x0110=036\x01";
        let framer = Framer::new();
        let mut buffer = StreamBuffer::from(&bogus_logon[..]);
        let mut sink = Collector::default();
        let err = framer.extract(&mut buffer, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            FramerError::CriticalFraming {
                fault: FramingFault::InvalidBodyLength,
                offset: 0,
            }
        ));
    }

    #[test]
    fn test_critical_after_emitted_messages() {
        let framer = Framer::new();
        let mut buffer = buffer_of(&[GOOD, BAD_LOGON]);
        let mut sink = Collector::default();
        let err = framer.extract(&mut buffer, &mut sink).unwrap_err();
        assert!(matches!(err, FramerError::CriticalFraming { offset, .. } if offset == GOOD.len()));
        // GOOD was already emitted and stays emitted
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].0, GOOD);
        assert_eq!(buffer.position(), GOOD.len());
    }

    #[test]
    fn test_well_formed_logon_frames_normally() {
        let mut buffer = StreamBuffer::from(GOOD_LOGON);
        let (outcome, frames) = extract_all(&mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![GOOD_LOGON.to_vec()]);
    }

    #[test]
    fn test_oversize_declared_length_resynchronized() {
        let framer = Framer::with_config(FramerConfig::new().with_max_message_size(64));
        let oversize = b"8=FIX.4.2\x019=999999\x0135=X\x01108=30\x0110=036\x01";
        let mut buffer = buffer_of(&[oversize, GOOD]);
        let mut sink = Collector::default();
        let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(outcome, ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(sink.frames[0].0, GOOD);
    }

    #[test]
    fn test_checksum_validation_skips_corrupt_message() {
        let framer = Framer::with_config(FramerConfig::new().with_checksum_validation(true));
        let corrupt = make_message("35=X\x01108=30\x01", true);
        let valid = make_message("35=X\x01108=30\x01", false);
        let mut buffer = buffer_of(&[&corrupt, &valid]);
        let mut sink = Collector::default();
        let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(outcome, ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(sink.frames[0].0, valid);
    }

    #[test]
    fn test_checksum_validation_escalates_on_logon() {
        let framer = Framer::with_config(FramerConfig::new().with_checksum_validation(true));
        let corrupt_logon = make_message("35=A\x01108=30\x01", true);
        let mut buffer = StreamBuffer::from(&corrupt_logon[..]);
        let mut sink = Collector::default();
        let err = framer.extract(&mut buffer, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            FramerError::CriticalFraming {
                fault: FramingFault::ChecksumMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_checksum_validation_accepts_true_checksum() {
        let framer = Framer::with_config(FramerConfig::new().with_checksum_validation(true));
        let valid = make_message("35=0\x0149=SENDER\x01", false);
        let mut buffer = StreamBuffer::from(&valid[..]);
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::Ready);
        let (outcome, frames) = extract_all_with(&framer, &mut buffer);
        assert_eq!(outcome.unwrap(), ExtractOutcome::Drained { emitted: 1 });
        assert_eq!(frames, vec![valid]);
    }

    #[test]
    fn test_empty_buffer() {
        let framer = Framer::new();
        let mut buffer = StreamBuffer::new();
        assert_eq!(framer.probe(&buffer).unwrap(), ProbeOutcome::NeedMoreData);
        let mut sink = Collector::default();
        let outcome = framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(outcome, ExtractOutcome::NeedMoreData);
    }

    #[test]
    fn test_closure_sink() {
        let framer = Framer::new();
        let mut buffer = buffer_of(&[GOOD, GOOD]);
        let mut count = 0usize;
        let mut sink = |_message: &[u8], _span: FrameSpan| count += 1;
        framer.extract(&mut buffer, &mut sink).unwrap();
        assert_eq!(count, 2);
    }

    /// Builds a message with a computed checksum, the way outbound encoders
    /// terminate messages; `corrupt` declares an off-by-one value instead.
    fn make_message(body: &str, corrupt: bool) -> Vec<u8> {
        let mut message = format!("8=FIX.4.2\x019={}\x01{}", body.len(), body).into_bytes();
        let mut checksum = crate::checksum::checksum_of(&message);
        if corrupt {
            checksum = checksum.wrapping_add(1);
        }
        message.extend_from_slice(format!("10={checksum:03}\x01").as_bytes());
        message
    }

    fn extract_all_with(
        framer: &Framer,
        buffer: &mut StreamBuffer,
    ) -> (Result<ExtractOutcome>, Vec<Vec<u8>>) {
        let mut sink = Collector::default();
        let outcome = framer.extract(buffer, &mut sink);
        (outcome, sink.frames.into_iter().map(|(m, _)| m).collect())
    }
}
