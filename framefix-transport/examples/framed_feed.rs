/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Replays a deliberately hostile byte feed through the framer codec.
//!
//! The feed mixes leading garbage, a message with a corrupt declared
//! length, and valid messages, delivered in small fragments the way a
//! congested TCP stream would. Run with:
//!
//! ```text
//! RUST_LOG=debug cargo run --example framed_feed
//! ```

use bytes::BytesMut;
use framefix_transport::FramerCodec;
use tokio_util::codec::Decoder;
use tracing::{info, warn};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

fn main() {
    init_logging();

    let heartbeat = b"8=FIX.4.2\x019=12\x0135=0\x01108=30\x0110=230\x01";
    let quote = b"8=FIX.4.2\x019=19\x0135=S\x01117=Q1\x01133=99\x0110=064\x01";
    let corrupt = b"8=FIX.4.2\x019=55\x0135=0\x01108=30\x0110=230\x01";

    let mut feed = Vec::new();
    feed.extend_from_slice(b"*** line noise ***");
    feed.extend_from_slice(heartbeat);
    feed.extend_from_slice(corrupt);
    feed.extend_from_slice(quote);
    feed.extend_from_slice(heartbeat);

    let mut codec = FramerCodec::new();
    let mut src = BytesMut::new();
    let mut emitted = 0usize;

    // deliver in 7-byte fragments to exercise the residual buffer
    for fragment in feed.chunks(7) {
        src.extend_from_slice(fragment);
        loop {
            match codec.decode(&mut src) {
                Ok(Some(frame)) => {
                    emitted += 1;
                    info!(
                        len = frame.len(),
                        msg_type = ?framefix_framer::peek_msg_type(&frame),
                        "frame {emitted}"
                    );
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "stream unrecoverable");
                    return;
                }
            }
        }
    }

    info!(emitted, residual = codec.residual(), "feed drained");
}
