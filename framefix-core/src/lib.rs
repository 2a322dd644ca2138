/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FrameFix Core
//!
//! Core types, cursor, and error definitions for the FrameFix framing engine.
//!
//! This crate provides the building blocks shared across all FrameFix crates:
//! - **Error types**: framing error hierarchy with `thiserror`
//! - **Stream buffer**: the transport-owned byte cursor with position,
//!   limit, and mark/reset semantics
//! - **Message vocabulary**: `MsgType` and `FrameSpan`
//!
//! ## Ownership model
//!
//! The stream buffer belongs to the transport layer for the lifetime of a
//! connection; the framer only reads from it and advances its position
//! within a single invocation. The framer itself carries no per-stream
//! state, which keeps it reentrant and trivially usable from one
//! single-threaded I/O driver per connection.

pub mod buffer;
pub mod error;
pub mod message;

pub use buffer::StreamBuffer;
pub use error::{FramerError, FramingFault, Result};
pub use message::{FrameSpan, MsgType};
