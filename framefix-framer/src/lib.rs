/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FrameFix Framer
//!
//! Streaming FIX message framer for the FrameFix engine.
//!
//! This crate turns an arbitrarily fragmented byte stream into complete,
//! well-formed FIX messages without ever blocking or losing stream
//! alignment:
//!
//! - **Header scanner**: recognizes a candidate message start and its
//!   declared body length, read-only
//! - **Body locator**: computes the exact message span from the declared
//!   length and verifies the checksum tag sits where it must
//! - **Resynchronizer**: skips past corrupt candidates to the next
//!   plausible message start, escalating instead of skipping when the
//!   suspect bytes carry a session-critical Logon
//! - **Decoder state machine**: [`Framer`], with a read-only
//!   [`probe`](Framer::probe) and a consuming [`extract`](Framer::extract)
//!
//! "Not enough data yet" is an outcome, not an error: the framer returns it
//! as a value and the transport re-invokes once more bytes arrive, carrying
//! the residual buffer forward.

pub mod checksum;
pub mod config;
pub mod framer;
pub mod locate;
pub mod resync;
pub mod scan;

pub use config::FramerConfig;
pub use framefix_core::buffer::StreamBuffer;
pub use framer::{ExtractOutcome, Framer, MessageSink, ProbeOutcome};
pub use scan::peek_msg_type;
