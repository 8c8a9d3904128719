//! Response reading for connected TCP streams.
//!
//! Services like SMTP, POP3, IMAP and SSH speak first, so a single read
//! right after the handshake is enough to capture what they announce.

use crate::error::{ScanError, ScanResult};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// Maximum bytes to read from a TCP service.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Longest banner excerpt written to logs.
const LOG_EXCERPT_LEN: usize = 64;

/// Perform one bounded read from a freshly connected stream.
///
/// An empty vector means the peer closed without sending anything. Read
/// errors and the deadline expiring are both reported as errors.
pub async fn read_banner<S>(stream: &mut S, read_timeout: Duration) -> ScanResult<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];

    match timeout(read_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) => {
            buffer.truncate(n);
            Ok(buffer)
        }
        Ok(Err(e)) => Err(ScanError::from_io(e)),
        Err(_) => Err(ScanError::Timeout),
    }
}

/// Printable excerpt of a response for log output.
pub fn excerpt(data: &[u8]) -> String {
    data.iter()
        .take(LOG_EXCERPT_LEN)
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
