/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FrameFix Transport
//!
//! Network transport adaptation for the FrameFix framing engine.
//!
//! This crate provides:
//! - **Codec**: a `tokio-util` codec that owns the per-connection residual
//!   buffer and hands out complete framed messages
//!
//! The framer core is transport-agnostic; any event-driven I/O layer can
//! adapt it the same way this codec does.

pub mod codec;

pub use codec::{CodecError, FramerCodec};
