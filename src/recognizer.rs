//! Protocol recognition from raw response bytes.
//!
//! Shallow signature matching: each rule looks at a fixed byte sequence at
//! the start or the end of the buffer. Rules are evaluated in table order and
//! the first hit wins, so overlapping signatures resolve by position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application protocols the scanner can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Ntp,
    Dns,
    Smtp,
    Pop3,
    Imap,
    Ssh,
    Http,
    Whois,
}

impl Protocol {
    /// Upper-case label printed in result lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ntp => "NTP",
            Self::Dns => "DNS",
            Self::Smtp => "SMTP",
            Self::Pop3 => "POP3",
            Self::Imap => "IMAP",
            Self::Ssh => "SSH",
            Self::Http => "HTTP",
            Self::Whois => "WHOIS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a signature must appear in the response.
#[derive(Debug, Clone, Copy)]
enum Signature {
    Prefix(&'static [u8]),
    Suffix(&'static [u8]),
}

impl Signature {
    fn matches(self, data: &[u8]) -> bool {
        match self {
            Self::Prefix(bytes) => data.starts_with(bytes),
            Self::Suffix(bytes) => data.ends_with(bytes),
        }
    }
}

/// Ordered signature table.
///
/// The DNS rule matches the tail of our own probe's encoded name
/// (`example.ru`), not DNS responses in general.
const SIGNATURES: &[(Signature, Protocol)] = &[
    (Signature::Prefix(b"\x1c"), Protocol::Ntp),
    (Signature::Suffix(b"\x00\x07exa"), Protocol::Dns),
    (Signature::Prefix(b"220"), Protocol::Smtp),
    (Signature::Prefix(b"+OK\r\n"), Protocol::Pop3),
    (Signature::Prefix(b"* OK IMAP"), Protocol::Imap),
    (Signature::Prefix(b"SSH"), Protocol::Ssh),
];

/// Classify a response buffer. `None` means the port answered but nothing
/// in the table matched.
pub fn recognize(data: &[u8]) -> Option<Protocol> {
    SIGNATURES
        .iter()
        .find(|(signature, _)| signature.matches(data))
        .map(|&(_, protocol)| protocol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banners() {
        assert_eq!(recognize(b"220 mail.example.ru ESMTP Postfix\r\n"), Some(Protocol::Smtp));
        assert_eq!(recognize(b"+OK\r\n"), Some(Protocol::Pop3));
        assert_eq!(
            recognize(b"* OK IMAP4rev1 Service Ready\r\n"),
            Some(Protocol::Imap)
        );
        assert_eq!(recognize(b"SSH-2.0-OpenSSH_9.6\r\n"), Some(Protocol::Ssh));
    }

    #[test]
    fn test_ntp_reply() {
        let mut reply = [0u8; 48];
        reply[0] = 0x1C;
        assert_eq!(recognize(&reply), Some(Protocol::Ntp));
    }

    #[test]
    fn test_ntp_takes_precedence() {
        // Matches the NTP prefix and the DNS suffix at once.
        assert_eq!(recognize(b"\x1c\x00\x07exa"), Some(Protocol::Ntp));
        assert_eq!(recognize(b"\x1cSSH-2.0"), Some(Protocol::Ntp));
    }

    #[test]
    fn test_dns_suffix_beats_banners() {
        assert_eq!(recognize(b"220\x00\x07exa"), Some(Protocol::Dns));
        assert_eq!(recognize(b"\x00\x14\x81\x80\x00\x07exa"), Some(Protocol::Dns));
    }

    #[test]
    fn test_unmatched() {
        assert_eq!(recognize(b""), None);
        assert_eq!(recognize(b"HTTP/1.1 400 Bad Request\r\n"), None);
        assert_eq!(recognize(b"+OK POP3 ready\r\n"), None);
        assert_eq!(recognize(b"* OK IMA"), None);
    }

    #[test]
    fn test_recognize_is_deterministic() {
        let data = b"SSH-1.99-Cisco-1.25\n";
        assert_eq!(recognize(data), recognize(data));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Protocol::Pop3.to_string(), "POP3");
        assert_eq!(Protocol::Whois.to_string(), "WHOIS");
    }
}
