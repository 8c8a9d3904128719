//! Protocol guesses based on well-known port numbers.
//!
//! Only consulted for TCP ports that accepted a connection but produced no
//! readable response.

use crate::recognizer::Protocol;
use crate::types::Port;

/// Guess the protocol for a silent, connected TCP port.
pub fn fallback_protocol(port: Port) -> Option<Protocol> {
    match port.as_u16() {
        80 => Some(Protocol::Http),
        43 => Some(Protocol::Whois),
        _ => None,
    }
}
