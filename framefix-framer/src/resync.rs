/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Stream resynchronization.
//!
//! When framing fails at a candidate offset, the stream is realigned by
//! searching forward for the next plausible message start. Suspect bytes
//! are skipped logically, never erased: they stay in the buffer until a
//! valid message is actually framed and consumed, so a future, larger
//! buffer can still be scanned from the original position.

use memchr::memmem;

/// Wire marker of a Logon (session-initiation) message: `<SOH>35=A<SOH>`.
const LOGON_MARKER: &[u8] = b"\x0135=A\x01";

/// Finds the next plausible message start at or after `from`.
///
/// # Arguments
/// * `buf` - All buffered bytes up to the limit
/// * `from` - Absolute offset to search from
/// * `prefix` - Begin-string literal a candidate must carry
#[must_use]
pub fn next_candidate(buf: &[u8], from: usize, prefix: &[u8]) -> Option<usize> {
    if from > buf.len() {
        return None;
    }
    memmem::find(&buf[from..], prefix).map(|at| from + at)
}

/// Returns true if the region carries a session-initiation (Logon) marker.
///
/// Checked on the suspect bytes of a failed candidate before they are
/// skipped: losing a Logon silently is worse than terminating the stream.
#[must_use]
pub fn contains_session_initiation(region: &[u8]) -> bool {
    memmem::find(region, LOGON_MARKER).is_some()
}
