//! TCP connect prober.
//!
//! Completes the full handshake, then performs one bounded read and hands
//! whatever arrived to the recognizer. A completed handshake already proves
//! the port is open, so every connected port produces a result.

use crate::banner::{excerpt, read_banner};
use crate::error::{ScanError, ScanResult};
use crate::recognizer::recognize;
use crate::scanner::traits::{ProbeResult, Prober, Transport};
use crate::services::fallback_protocol;
use crate::types::Port;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// TCP connect prober.
///
/// Does not require elevated privileges.
pub struct TcpProber {
    target: Ipv4Addr,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpProber {
    /// Create a new TCP prober.
    ///
    /// # Arguments
    /// * `target` - Address to probe
    /// * `connect_timeout` - Deadline for the handshake
    /// * `read_timeout` - Deadline for the first read after connecting
    pub fn new(target: Ipv4Addr, connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            target,
            connect_timeout,
            read_timeout,
        }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> ScanResult<TcpStream> {
        match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ScanError::from_io(e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn transport(&self) -> Transport {
        Transport::Tcp
    }

    fn target(&self) -> Ipv4Addr {
        self.target
    }

    async fn probe(&self, port: Port) -> Option<ProbeResult> {
        let addr = SocketAddr::from((self.target, port.as_u16()));

        let mut stream = match self.attempt_connect(addr).await {
            Ok(stream) => stream,
            // A reset only surfaces here once the handshake has completed.
            Err(ScanError::ConnectionReset) => {
                debug!("TCP {}: reset right after accept, guessing by port", addr);
                return Some(ProbeResult::new(Transport::Tcp, port, fallback_protocol(port)));
            }
            Err(e) => {
                debug!("TCP {}: no connection ({})", addr, e);
                return None;
            }
        };

        let protocol = match read_banner(&mut stream, self.read_timeout).await {
            Ok(data) => {
                trace!("TCP {}: read {} bytes: {}", addr, data.len(), excerpt(&data));
                recognize(&data)
            }
            Err(e) => {
                debug!("TCP {}: connected but read failed ({}), guessing by port", addr, e);
                fallback_protocol(port)
            }
        };

        Some(ProbeResult::new(Transport::Tcp, port, protocol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::Protocol;
    use socket2::SockRef;
    use std::thread;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn prober() -> TcpProber {
        TcpProber::new(
            Ipv4Addr::LOCALHOST,
            Duration::from_secs(1),
            Duration::from_millis(200),
        )
    }

    async fn listener() -> (TcpListener, Port) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        (listener, port)
    }

    #[test]
    fn test_prober_creation() {
        let prober = prober();
        assert_eq!(prober.target(), Ipv4Addr::LOCALHOST);
        assert_eq!(prober.transport(), Transport::Tcp);
    }

    #[tokio::test]
    async fn test_closed_port() {
        let (listener, port) = listener().await;
        drop(listener);

        assert_eq!(prober().probe(port).await, None);
    }

    #[tokio::test]
    async fn test_banner_recognized() {
        let (listener, port) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 localhost ESMTP\r\n").await.unwrap();
            socket
        });

        let result = prober().probe(port).await;
        assert_eq!(
            result,
            Some(ProbeResult::new(Transport::Tcp, port, Some(Protocol::Smtp)))
        );
        drop(server.await.unwrap());
    }

    #[tokio::test]
    async fn test_silent_port_reported_open() {
        let (listener, port) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(socket);
        });

        let result = prober().probe(port).await;
        assert_eq!(result, Some(ProbeResult::new(Transport::Tcp, port, None)));
        server.abort();
    }

    #[tokio::test]
    async fn test_clean_close_reports_unknown() {
        let (listener, port) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let result = prober().probe(port).await;
        assert_eq!(result, Some(ProbeResult::new(Transport::Tcp, port, None)));
        server.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reset_after_accept_is_open() {
        let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        thread::spawn(move || {
            for socket in listener.incoming().flatten() {
                let _ = SockRef::from(&socket).set_linger(Some(Duration::ZERO));
                drop(socket);
            }
        });

        for _ in 0..10 {
            let result = prober().probe(port).await;
            assert_eq!(result, Some(ProbeResult::new(Transport::Tcp, port, None)));
        }
    }
}
