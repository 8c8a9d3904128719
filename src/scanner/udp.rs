//! UDP prober.
//!
//! UDP services only answer requests they understand, so the prober walks
//! a fixed list of payloads (DNS query, empty datagram, NTP request) and
//! stops at the first one that draws any reply. A port that never replies
//! is indistinguishable from a closed or filtered one and yields nothing.

use crate::banner::excerpt;
use crate::error::{ScanError, ScanResult};
use crate::probes::udp_attempts;
use crate::recognizer::recognize;
use crate::scanner::traits::{ProbeResult, Prober, Transport};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Largest reply datagram read per attempt.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// UDP prober for detecting answering UDP services.
pub struct UdpProber {
    target: Ipv4Addr,
    recv_timeout: Duration,
}

impl UdpProber {
    /// Create a new UDP prober.
    ///
    /// # Arguments
    /// * `target` - Address to probe
    /// * `recv_timeout` - How long to wait for a reply to each payload
    pub fn new(target: Ipv4Addr, recv_timeout: Duration) -> Self {
        Self {
            target,
            recv_timeout,
        }
    }

    /// Send one payload and wait for a reply.
    async fn exchange(
        &self,
        socket: &UdpSocket,
        addr: SocketAddr,
        payload: &[u8],
        buf: &mut [u8],
    ) -> ScanResult<usize> {
        socket
            .send_to(payload, addr)
            .await
            .map_err(ScanError::from_io)?;

        match timeout(self.recv_timeout, socket.recv_from(buf)).await {
            Ok(Ok((n, _))) => Ok(n),
            Ok(Err(e)) => Err(ScanError::from_io(e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for UdpProber {
    fn transport(&self) -> Transport {
        Transport::Udp
    }

    fn target(&self) -> Ipv4Addr {
        self.target
    }

    async fn probe(&self, port: Port) -> Option<ProbeResult> {
        let addr = SocketAddr::from((self.target, port.as_u16()));

        let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await {
            Ok(socket) => socket,
            Err(e) => {
                debug!("UDP {}: could not bind a local socket ({})", addr, e);
                return None;
            }
        };

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        for (attempt, payload) in udp_attempts().into_iter().enumerate() {
            match self.exchange(&socket, addr, payload, &mut buf).await {
                Ok(n) => {
                    trace!("UDP {}: attempt {} got {} bytes: {}", addr, attempt, n, excerpt(&buf[..n]));
                    return Some(ProbeResult::new(Transport::Udp, port, recognize(&buf[..n])));
                }
                Err(e) => trace!("UDP {}: attempt {} failed ({})", addr, attempt, e),
            }
        }

        debug!("UDP {}: no reply to any payload", addr);
        None
    }
}
