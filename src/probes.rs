//! Probe payload catalog.
//!
//! Request bytes for services that stay silent until asked something in
//! their own format, plus the trivial payloads used to nudge an unknown
//! service into answering. Every payload is built once and shared by
//! reference across all probe tasks.

use std::sync::LazyLock;

/// Transaction id carried by the DNS probe.
pub const DNS_QUERY_ID: u16 = 20;

/// Header flags for the DNS probe: standard query, recursion desired.
pub const DNS_QUERY_FLAGS: u16 = 0x0100;

/// Name asked for by the DNS probe.
pub const DNS_QUERY_NAME: &str = "example.ru";

const DNS_TYPE_A: u16 = 1;
const DNS_CLASS_IN: u16 = 1;

/// Length of an NTP packet without extension fields.
pub const NTP_PACKET_LEN: usize = 48;

/// LI = 0, version 3, mode 3 (client).
const NTP_CLIENT_V3: u8 = 0x1B;

/// NTP client request.
pub static NTP_REQUEST: [u8; NTP_PACKET_LEN] = build_ntp_request();

/// Minimal HTTP/1.1 request.
pub static HTTP_PROBE: &[u8] = b"GET / HTTP/1.1\r\n\r\n";

/// Zero-length payload for services that talk first.
pub static EMPTY_PROBE: &[u8] = b"";

/// Single-question DNS query for [`DNS_QUERY_NAME`].
pub static DNS_QUERY: LazyLock<Vec<u8>> = LazyLock::new(build_dns_query);

/// Build a one-question A/IN query for [`DNS_QUERY_NAME`].
pub fn build_dns_query() -> Vec<u8> {
    let mut packet = Vec::with_capacity(12 + DNS_QUERY_NAME.len() + 2 + 4);

    // Header
    packet.extend_from_slice(&DNS_QUERY_ID.to_be_bytes());
    packet.extend_from_slice(&DNS_QUERY_FLAGS.to_be_bytes());
    packet.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    packet.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    packet.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    packet.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT

    // QNAME as length-prefixed labels
    for label in DNS_QUERY_NAME.split('.') {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);

    packet.extend_from_slice(&DNS_TYPE_A.to_be_bytes());
    packet.extend_from_slice(&DNS_CLASS_IN.to_be_bytes());
    packet
}

/// Build a 48-byte NTPv3 client request.
pub const fn build_ntp_request() -> [u8; NTP_PACKET_LEN] {
    let mut request = [0u8; NTP_PACKET_LEN];
    request[0] = NTP_CLIENT_V3;
    request
}

/// The HTTP GET probe.
pub fn build_http_probe() -> &'static [u8] {
    HTTP_PROBE
}

/// The empty probe.
pub fn empty_probe() -> &'static [u8] {
    EMPTY_PROBE
}

/// Payloads tried against a UDP port, in order, until one draws a reply.
pub fn udp_attempts() -> [&'static [u8]; 3] {
    [DNS_QUERY.as_slice(), EMPTY_PROBE, NTP_REQUEST.as_slice()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_dns_resolver::proto::op::{Message, MessageType, OpCode};
    use trust_dns_resolver::proto::rr::{DNSClass, Name, RecordType};

    #[test]
    fn test_dns_query_header_bytes() {
        let packet = build_dns_query();
        assert_eq!(
            &packet[..12],
            &[0x00u8, 0x14, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(&packet[12..], b"\x07example\x02ru\x00\x00\x01\x00\x01");
    }

    #[test]
    fn test_dns_query_parses_as_dns_message() {
        let message = Message::from_vec(&DNS_QUERY).unwrap();

        assert_eq!(message.id(), 20);
        assert_eq!(message.message_type(), MessageType::Query);
        assert_eq!(message.op_code(), OpCode::Query);
        assert!(message.recursion_desired());
        assert_eq!(message.answers().len(), 0);
        assert_eq!(message.name_servers().len(), 0);
        assert_eq!(message.additionals().len(), 0);

        let queries = message.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(*queries[0].name(), Name::from_ascii("example.ru.").unwrap());
        assert_eq!(queries[0].query_type(), RecordType::A);
        assert_eq!(queries[0].query_class(), DNSClass::IN);
    }

    #[test]
    fn test_ntp_request_layout() {
        assert_eq!(NTP_REQUEST.len(), 48);
        assert_eq!(NTP_REQUEST[0], 0x1B);
        assert!(NTP_REQUEST[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trivial_payloads() {
        assert_eq!(build_http_probe(), b"GET / HTTP/1.1\r\n\r\n");
        assert!(empty_probe().is_empty());
    }

    #[test]
    fn test_udp_attempt_order() {
        let attempts = udp_attempts();
        assert_eq!(attempts[0], DNS_QUERY.as_slice());
        assert!(attempts[1].is_empty());
        assert_eq!(attempts[2], &NTP_REQUEST[..]);
    }

    #[test]
    fn test_payloads_are_shared() {
        assert!(std::ptr::eq(udp_attempts()[0], udp_attempts()[0]));
        assert!(std::ptr::eq(DNS_QUERY.as_slice(), DNS_QUERY.as_slice()));
    }
}
